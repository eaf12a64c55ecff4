//! 应用层实现。
//!
//! 这里提供围绕领域模型的用例服务：创建与列出活动，以及把已发布活动的
//! 通知交给后台 worker 投递。外部适配器（存储、Webhook）以 trait 抽象。

pub mod dto;
pub mod error;
pub mod notification;
pub mod notifier;
pub mod services;

#[cfg(test)]
mod test_support;

pub use dto::EventSummaryDto;
pub use error::ApplicationError;
pub use notification::{
    format_announcement, DispatchError, LoggingFailureHandler, NotificationDispatcher,
    NotificationFailure, NotificationFailureHandler, NotificationJob, NotificationWorker,
    NotificationWorkerDependencies,
};
pub use notifier::{Announcement, NotifierError, WebhookNotifier};
pub use services::{
    CreateEventRequest, CreatedEvent, EventService, EventServiceDependencies,
};
