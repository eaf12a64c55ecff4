//! 活动Repository接口定义

use async_trait::async_trait;

use crate::entities::{Event, EventId, NewEvent};
use crate::errors::RepositoryError;

/// 活动存储接口，内存与 SQLite 两种后端实现同一组操作。
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// 持久化新活动并分配单调递增的 ID
    async fn create(&self, event: NewEvent) -> Result<Event, RepositoryError>;

    /// 根据ID查找活动
    async fn find_by_id(&self, id: EventId) -> Result<Option<Event>, RepositoryError>;

    /// 按 ID 升序返回全部活动
    async fn list_all(&self) -> Result<Vec<Event>, RepositoryError>;
}
