//! 基础设施层实现。
//!
//! 提供活动存储（内存 / SQLite）与 Webhook 推送适配器，实现应用/领域层定义的接口。

pub mod builder;
pub mod memory;
pub mod migrations;
pub mod repository;
pub mod webhook;

pub use builder::{build_notifier, Infrastructure, InfrastructureError};
pub use memory::InMemoryEventRepository;
pub use migrations::MIGRATOR;
pub use repository::{create_sqlite_pool, SqliteEventRepository};
pub use webhook::{DiscordWebhookClient, LogOnlyNotifier};
