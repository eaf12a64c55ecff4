//! 主应用程序入口
//!
//! 加载配置、装配存储与 Webhook 推送，启动 Axum Web API 服务。

use std::sync::Arc;

use application::{
    EventService, EventServiceDependencies, LoggingFailureHandler, NotificationWorker,
    NotificationWorkerDependencies,
};
use config::AppConfig;
use infrastructure::Infrastructure;
use tracing_subscriber::EnvFilter;
use web_api::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load()?;
    tracing::info!(config = %config.sanitize(), "配置加载完成");

    let infrastructure = Infrastructure::connect(&config).await?;

    // 通知 worker 与请求处理解耦，只通过队列交互
    let (dispatcher, worker) = NotificationWorker::spawn(NotificationWorkerDependencies {
        event_repository: infrastructure.event_repository.clone(),
        notifier: infrastructure.notifier.clone(),
        failure_handler: Arc::new(LoggingFailureHandler),
    });

    let event_service = Arc::new(EventService::new(EventServiceDependencies {
        event_repository: infrastructure.event_repository.clone(),
        dispatcher,
    }));

    let app = router(AppState::new(event_service));
    let listener = tokio::net::TcpListener::bind(config.server.bind_address()).await?;

    tracing::info!("活动服务启动在 http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // 路由已释放，队列关闭后等待剩余通知发送完毕
    tracing::info!("等待剩余通知发送完成");
    worker.await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "无法监听 Ctrl-C 信号");
        std::future::pending::<()>().await;
    }
    tracing::info!("收到关闭信号");
}
