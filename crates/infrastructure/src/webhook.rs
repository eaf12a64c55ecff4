//! Webhook 推送适配器。

use std::time::Duration;

use application::{Announcement, NotifierError, WebhookNotifier};
use async_trait::async_trait;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<&'a str>,
}

/// 以 `{"content": ...}` 形式 POST 到聊天平台的 Webhook
#[derive(Clone)]
pub struct DiscordWebhookClient {
    client: reqwest::Client,
    url: String,
    username: Option<String>,
}

impl DiscordWebhookClient {
    pub fn new(
        url: impl Into<String>,
        username: Option<String>,
        timeout: Duration,
    ) -> Result<Self, NotifierError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| NotifierError::transport(err.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
            username,
        })
    }
}

#[async_trait]
impl WebhookNotifier for DiscordWebhookClient {
    async fn send(&self, announcement: &Announcement) -> Result<(), NotifierError> {
        let payload = WebhookPayload {
            content: &announcement.content,
            username: self.username.as_deref(),
        };

        // URL 中带有令牌，错误信息里去掉
        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|err| NotifierError::transport(err.without_url().to_string()))?;

        // 默认返回 204；URL 带 `?wait=true` 时返回 200 和消息体，同样算成功
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(NotifierError::rejected(status.as_u16(), body))
    }
}

/// 未配置 Webhook 时使用，只写日志
#[derive(Debug, Default)]
pub struct LogOnlyNotifier;

#[async_trait]
impl WebhookNotifier for LogOnlyNotifier {
    async fn send(&self, announcement: &Announcement) -> Result<(), NotifierError> {
        tracing::info!(
            event_id = %announcement.event_id,
            content = %announcement.content,
            "Webhook not configured, announcement logged only"
        );
        Ok(())
    }
}
