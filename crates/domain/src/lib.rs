//! 活动发布系统核心领域模型
//!
//! 包含活动实体、对外公开的投影视图，以及仓储接口和错误定义。

pub mod entities;
pub mod errors;
pub mod repositories;

// 重新导出常用类型
pub use entities::*;
pub use errors::*;
pub use repositories::*;
