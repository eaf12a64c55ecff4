use async_trait::async_trait;
use domain::EventId;
use thiserror::Error;

/// 一条待推送到聊天频道的活动公告
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub event_id: EventId,
    pub content: String,
}

#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("webhook transport failed: {0}")]
    Transport(String),
    #[error("webhook rejected delivery with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

impl NotifierError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn rejected(status: u16, body: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            body: body.into(),
        }
    }
}

/// 外部 Webhook 推送端口，每次调用只做一次尝试。
#[async_trait]
pub trait WebhookNotifier: Send + Sync {
    async fn send(&self, announcement: &Announcement) -> Result<(), NotifierError>;
}
