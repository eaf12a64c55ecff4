use std::sync::Arc;

use domain::{DomainError, EventId, EventRepository, NewEvent};

use crate::{dto::EventSummaryDto, error::ApplicationError, notification::NotificationDispatcher};

#[derive(Debug, Clone)]
pub struct CreateEventRequest {
    pub title: String,
    pub host: String,
    pub public_description: String,
    pub vault_details: String,
    pub is_published: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedEvent {
    pub id: EventId,
    pub title: String,
    /// 是否已把通知任务放入队列
    pub notification_queued: bool,
}

pub struct EventServiceDependencies {
    pub event_repository: Arc<dyn EventRepository>,
    pub dispatcher: NotificationDispatcher,
}

pub struct EventService {
    deps: EventServiceDependencies,
}

impl EventService {
    pub fn new(deps: EventServiceDependencies) -> Self {
        Self { deps }
    }

    /// 持久化活动；若已发布则排队一条通知。
    ///
    /// 入队结果不影响返回值，通知投递在后台进行。
    pub async fn create_event(
        &self,
        request: CreateEventRequest,
    ) -> Result<CreatedEvent, ApplicationError> {
        let stored = self
            .deps
            .event_repository
            .create(NewEvent {
                title: request.title,
                host: request.host,
                public_description: request.public_description,
                vault_details: request.vault_details,
                is_published: request.is_published,
            })
            .await?;

        tracing::info!(
            event_id = %stored.id,
            is_published = stored.is_published,
            "Event created"
        );

        let notification_queued = if stored.is_published {
            match self.deps.dispatcher.notify(stored.id) {
                Ok(()) => true,
                Err(err) => {
                    tracing::warn!(event_id = %stored.id, error = %err, "Failed to queue event notification");
                    false
                }
            }
        } else {
            false
        };

        Ok(CreatedEvent {
            id: stored.id,
            title: stored.title,
            notification_queued,
        })
    }

    /// 列出全部活动的公开视图
    pub async fn list_events(&self) -> Result<Vec<EventSummaryDto>, ApplicationError> {
        let events = self.deps.event_repository.list_all().await?;
        Ok(events
            .iter()
            .map(|event| EventSummaryDto::from(event.public_view()))
            .collect())
    }

    /// 按 ID 读取单个活动的公开视图
    pub async fn get_event(&self, id: EventId) -> Result<EventSummaryDto, ApplicationError> {
        let event = self
            .deps
            .event_repository
            .find_by_id(id)
            .await?
            .ok_or(DomainError::EventNotFound { id })?;
        Ok(EventSummaryDto::from(event.public_view()))
    }
}
