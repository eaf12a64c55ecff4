//! 领域实体定义

pub mod event;

// 重新导出核心实体
pub use event::{Event, EventId, NewEvent, PublicEvent};
