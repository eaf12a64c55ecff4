//! 单元测试共用的替身实现

use std::sync::{
    atomic::{AtomicI64, Ordering},
    Mutex,
};

use async_trait::async_trait;
use domain::{Event, EventId, EventRepository, NewEvent, RepositoryError};

use crate::notification::{NotificationFailure, NotificationFailureHandler};
use crate::notifier::{Announcement, NotifierError, WebhookNotifier};

pub fn sample_new_event(is_published: bool) -> NewEvent {
    NewEvent {
        title: "Midnight Coding Session".to_string(),
        host: "CodeMaster99".to_string(),
        public_description: "Bring snacks".to_string(),
        vault_details: "room 42".to_string(),
        is_published,
    }
}

pub fn sample_event(id: i64, is_published: bool) -> Event {
    Event::from_new(EventId(id), sample_new_event(is_published))
}

/// 记录每次推送，可选择以固定状态码拒绝
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Announcement>>,
    reject_with: Option<u16>,
}

impl RecordingNotifier {
    pub fn rejecting(status: u16) -> Self {
        Self {
            sent: Mutex::default(),
            reject_with: Some(status),
        }
    }

    pub fn sent(&self) -> Vec<Announcement> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl WebhookNotifier for RecordingNotifier {
    async fn send(&self, announcement: &Announcement) -> Result<(), NotifierError> {
        self.sent.lock().unwrap().push(announcement.clone());
        match self.reject_with {
            Some(status) => Err(NotifierError::rejected(status, "")),
            None => Ok(()),
        }
    }
}

#[derive(Default)]
pub struct RecordingFailureHandler {
    failures: Mutex<Vec<String>>,
}

impl RecordingFailureHandler {
    pub fn failures(&self) -> Vec<String> {
        self.failures.lock().unwrap().clone()
    }
}

impl NotificationFailureHandler for RecordingFailureHandler {
    fn on_failure(&self, failure: &NotificationFailure) {
        self.failures.lock().unwrap().push(failure.to_string());
    }
}

/// 最小的内存仓储，ID 从 1 开始递增
#[derive(Default)]
pub struct FakeEventRepository {
    next_id: AtomicI64,
    events: Mutex<Vec<Event>>,
}

#[async_trait]
impl EventRepository for FakeEventRepository {
    async fn create(&self, event: NewEvent) -> Result<Event, RepositoryError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let stored = Event::from_new(EventId(id), event);
        self.events.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: EventId) -> Result<Option<Event>, RepositoryError> {
        Ok(self
            .events
            .lock()
            .unwrap()
            .iter()
            .find(|event| event.id == id)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<Event>, RepositoryError> {
        Ok(self.events.lock().unwrap().clone())
    }
}
