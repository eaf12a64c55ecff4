//! 进程内存储，进程退出后数据丢失。

use async_trait::async_trait;
use domain::{Event, EventId, EventRepository, NewEvent, RepositoryError};
use tokio::sync::RwLock;

#[derive(Default)]
struct MemoryState {
    last_id: i64,
    events: Vec<Event>,
}

#[derive(Default)]
pub struct InMemoryEventRepository {
    state: RwLock<MemoryState>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn create(&self, event: NewEvent) -> Result<Event, RepositoryError> {
        let mut guard = self.state.write().await;
        guard.last_id += 1;
        let stored = Event::from_new(EventId(guard.last_id), event);
        guard.events.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: EventId) -> Result<Option<Event>, RepositoryError> {
        let guard = self.state.read().await;
        // 按 ID 递增追加，可以二分查找
        Ok(guard
            .events
            .binary_search_by_key(&id, |event| event.id)
            .ok()
            .map(|index| guard.events[index].clone()))
    }

    async fn list_all(&self) -> Result<Vec<Event>, RepositoryError> {
        Ok(self.state.read().await.events.clone())
    }
}
