//! 活动实体定义

use std::fmt;

use serde::{Deserialize, Serialize};

/// 活动唯一标识，由存储在创建时分配。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub i64);

impl EventId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for EventId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<EventId> for i64 {
    fn from(value: EventId) -> Self {
        value.0
    }
}

/// 尚未持久化的活动，字段不做长度或格式限制，空字符串同样有效。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub host: String,
    pub public_description: String,
    /// 私密信息，只对创建者返回，不出现在列表和通知中
    pub vault_details: String,
    #[serde(default)]
    pub is_published: bool,
}

/// 已持久化的活动
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub host: String,
    pub public_description: String,
    pub vault_details: String,
    pub is_published: bool,
}

impl Event {
    /// 使用存储分配的 ID 落定一个新活动
    pub fn from_new(id: EventId, new_event: NewEvent) -> Self {
        Self {
            id,
            title: new_event.title,
            host: new_event.host,
            public_description: new_event.public_description,
            vault_details: new_event.vault_details,
            is_published: new_event.is_published,
        }
    }

    /// 公开视图，去掉 `vault_details` 与 `is_published`
    pub fn public_view(&self) -> PublicEvent {
        PublicEvent {
            id: self.id,
            title: self.title.clone(),
            host: self.host.clone(),
            public_description: self.public_description.clone(),
        }
    }
}

/// 活动的公开投影。
///
/// 类型上不存在私密字段，列表接口只能基于它构造响应。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicEvent {
    pub id: EventId,
    pub title: String,
    pub host: String,
    pub public_description: String,
}
