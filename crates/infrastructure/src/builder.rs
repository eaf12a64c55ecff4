use std::{sync::Arc, time::Duration};

use application::{NotifierError, WebhookNotifier};
use config::{AppConfig, StorageBackend, WebhookConfig};
use domain::EventRepository;
use thiserror::Error;

use crate::{
    memory::InMemoryEventRepository,
    migrations::MIGRATOR,
    repository::{create_sqlite_pool, SqliteEventRepository},
    webhook::{DiscordWebhookClient, LogOnlyNotifier},
};

#[derive(Debug, Error)]
pub enum InfrastructureError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("webhook client error: {0}")]
    Webhook(#[from] NotifierError),
}

#[derive(Clone)]
pub struct Infrastructure {
    pub event_repository: Arc<dyn EventRepository>,
    pub notifier: Arc<dyn WebhookNotifier>,
}

impl Infrastructure {
    pub async fn connect(config: &AppConfig) -> Result<Self, InfrastructureError> {
        let event_repository: Arc<dyn EventRepository> = match config.storage.backend {
            StorageBackend::Memory => {
                tracing::info!("Using in-memory event store");
                Arc::new(InMemoryEventRepository::new())
            }
            StorageBackend::Sqlite => {
                tracing::info!(url = %config.database.url, "Connecting to SQLite");
                let pool =
                    create_sqlite_pool(&config.database.url, config.database.max_connections)
                        .await?;
                MIGRATOR.run(&pool).await?;
                Arc::new(SqliteEventRepository::new(pool))
            }
        };

        Ok(Self {
            event_repository,
            notifier: build_notifier(&config.webhook)?,
        })
    }
}

/// 配置了 URL 时推送到 Webhook，否则只写日志
pub fn build_notifier(
    config: &WebhookConfig,
) -> Result<Arc<dyn WebhookNotifier>, InfrastructureError> {
    match &config.url {
        Some(url) => Ok(Arc::new(DiscordWebhookClient::new(
            url.clone(),
            config.username.clone(),
            Duration::from_secs(config.timeout_seconds),
        )?)),
        None => {
            tracing::warn!("No webhook URL configured, announcements will only be logged");
            Ok(Arc::new(LogOnlyNotifier))
        }
    }
}
