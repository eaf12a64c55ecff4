//! 领域模型错误定义
//!
//! 仓储层错误在这里统一定义，由应用层和 Web 层各自映射。

use thiserror::Error;

use crate::entities::EventId;

/// 领域模型错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// 活动不存在
    #[error("活动不存在: ID {id}")]
    EventNotFound { id: EventId },
}

/// 仓储层错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RepositoryError {
    #[error("storage error: {message}")]
    Storage { message: String },
}

impl RepositoryError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}
