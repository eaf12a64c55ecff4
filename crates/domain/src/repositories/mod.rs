//! Repository接口定义
//!
//! 定义数据访问层的抽象接口，遵循清洁架构原则，内层定义接口，外层实现接口。

pub mod event_repository;

pub use event_repository::EventRepository;

#[cfg(feature = "testing")]
pub use event_repository::MockEventRepository;
