//! 向配置的 Webhook 发送一条示例活动公告，用于验证 URL 与频道设置。

use application::{format_announcement, Announcement, NotifierError, WebhookNotifier};
use config::AppConfig;
use domain::{Event, EventId, NewEvent};
use infrastructure::build_notifier;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load()?;
    if config.webhook.url.is_none() {
        anyhow::bail!("APP_WEBHOOK__URL is not set; nothing to send");
    }
    let notifier = build_notifier(&config.webhook)?;

    let event = Event::from_new(
        EventId(0),
        NewEvent {
            title: "Midnight Coding Session".to_string(),
            host: "CodeMaster99".to_string(),
            public_description: "Test announcement from the Event Board".to_string(),
            vault_details: String::new(),
            is_published: true,
        },
    );
    let announcement = Announcement {
        event_id: event.id,
        content: format_announcement(&event),
    };

    match notifier.send(&announcement).await {
        Ok(()) => {
            println!("Success! Check your channel.");
            Ok(())
        }
        Err(NotifierError::Rejected { status, body }) => {
            println!("Failed with status code: {status}");
            println!("{body}");
            anyhow::bail!("webhook rejected the test notification")
        }
        Err(err) => Err(err.into()),
    }
}
