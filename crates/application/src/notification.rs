//! 已发布活动的后台通知。
//!
//! 请求处理路径只负责把 [`NotificationJob`] 放入队列，由 [`NotificationWorker`]
//! 在独立任务中回读存储、格式化公告并推送。投递失败交给
//! [`NotificationFailureHandler`]，不重试，也不会回传给创建者。

use std::sync::Arc;

use domain::{Event, EventId, EventRepository, RepositoryError};
use thiserror::Error;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::notifier::{Announcement, NotifierError, WebhookNotifier};

/// 格式化公告正文，只使用公开字段。
pub fn format_announcement(event: &Event) -> String {
    format!(
        "🎉 **New Event Alert!** 🎉\n\
         **{}** is being hosted by **{}**!\n\n\
         **Details:** {}\n\
         *Head to the Event Board to request Vault access.*",
        event.title, event.host, event.public_description
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationJob {
    pub event_id: EventId,
}

#[derive(Debug, Error)]
pub enum NotificationFailure {
    #[error("event {0} not found at dispatch time")]
    EventMissing(EventId),
    #[error("failed to load event {event_id}: {source}")]
    Lookup {
        event_id: EventId,
        #[source]
        source: RepositoryError,
    },
    #[error("delivery for event {event_id} failed: {source}")]
    Delivery {
        event_id: EventId,
        #[source]
        source: NotifierError,
    },
}

impl NotificationFailure {
    pub fn event_id(&self) -> EventId {
        match self {
            NotificationFailure::EventMissing(id) => *id,
            NotificationFailure::Lookup { event_id, .. } => *event_id,
            NotificationFailure::Delivery { event_id, .. } => *event_id,
        }
    }
}

/// 投递失败回调
pub trait NotificationFailureHandler: Send + Sync {
    fn on_failure(&self, failure: &NotificationFailure);
}

/// 默认回调：记录日志后丢弃
#[derive(Debug, Default)]
pub struct LoggingFailureHandler;

impl NotificationFailureHandler for LoggingFailureHandler {
    fn on_failure(&self, failure: &NotificationFailure) {
        tracing::warn!(
            event_id = %failure.event_id(),
            error = %failure,
            "Event notification dropped"
        );
    }
}

#[derive(Debug, Error)]
#[error("notification queue closed, job for event {0} dropped")]
pub struct DispatchError(pub EventId);

/// 通知队列的发送端，可随意克隆。
///
/// 所有克隆都被释放后，worker 处理完剩余任务即退出。
#[derive(Debug, Clone)]
pub struct NotificationDispatcher {
    sender: mpsc::UnboundedSender<NotificationJob>,
}

impl NotificationDispatcher {
    /// 入队后立即返回，不等待投递
    pub fn notify(&self, event_id: EventId) -> Result<(), DispatchError> {
        self.sender
            .send(NotificationJob { event_id })
            .map_err(|_| DispatchError(event_id))?;
        tracing::debug!(event_id = %event_id, "Event notification queued");
        Ok(())
    }
}

pub struct NotificationWorkerDependencies {
    pub event_repository: Arc<dyn EventRepository>,
    pub notifier: Arc<dyn WebhookNotifier>,
    pub failure_handler: Arc<dyn NotificationFailureHandler>,
}

pub struct NotificationWorker {
    deps: NotificationWorkerDependencies,
    receiver: mpsc::UnboundedReceiver<NotificationJob>,
}

impl NotificationWorker {
    pub fn new(deps: NotificationWorkerDependencies) -> (NotificationDispatcher, Self) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (NotificationDispatcher { sender }, Self { deps, receiver })
    }

    /// 创建队列并在 tokio 运行时上启动 worker
    pub fn spawn(deps: NotificationWorkerDependencies) -> (NotificationDispatcher, JoinHandle<()>) {
        let (dispatcher, worker) = Self::new(deps);
        let handle = tokio::spawn(worker.run());
        (dispatcher, handle)
    }

    pub async fn run(mut self) {
        tracing::info!("Notification worker started");
        while let Some(job) = self.receiver.recv().await {
            self.process(job).await;
        }
        tracing::info!("Notification queue closed, worker stopped");
    }

    async fn process(&self, job: NotificationJob) {
        match self.deliver(job).await {
            Ok(()) => tracing::info!(event_id = %job.event_id, "Event notification delivered"),
            Err(failure) => self.deps.failure_handler.on_failure(&failure),
        }
    }

    async fn deliver(&self, job: NotificationJob) -> Result<(), NotificationFailure> {
        // 以存储中的记录为准，而不是请求里的原始数据
        let event = self
            .deps
            .event_repository
            .find_by_id(job.event_id)
            .await
            .map_err(|source| NotificationFailure::Lookup {
                event_id: job.event_id,
                source,
            })?
            .ok_or(NotificationFailure::EventMissing(job.event_id))?;

        let announcement = Announcement {
            event_id: event.id,
            content: format_announcement(&event),
        };

        self.deps
            .notifier
            .send(&announcement)
            .await
            .map_err(|source| NotificationFailure::Delivery {
                event_id: job.event_id,
                source,
            })
    }
}
