//! 应用层错误定义
//!
//! 统一的命令/查询错误类型，每个错误对应一个信封错误码

use thiserror::Error;

use crate::application::ports::{RepositoryError, SchedulerError};
use crate::domain::chapter::ChapterError;
use crate::domain::envelope::{EnvelopeError, ErrorCode};

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 资源未找到
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// 领域规则错误（校验失败 / 状态冲突）
    #[error(transparent)]
    Chapter(#[from] ChapterError),

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 资源冲突
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 仓储错误
    #[error("Repository error: {0}")]
    RepositoryError(String),

    /// 外部服务错误
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建冲突错误
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl EnvelopeError for ApplicationError {
    fn error_code(&self) -> ErrorCode {
        match self {
            ApplicationError::NotFound { .. } => ErrorCode::NotFound,
            ApplicationError::Chapter(e) => e.error_code(),
            ApplicationError::ValidationError(_) => ErrorCode::ValidationError,
            ApplicationError::Conflict(_) => ErrorCode::Conflict,
            ApplicationError::RepositoryError(_)
            | ApplicationError::ExternalServiceError(_)
            | ApplicationError::InternalError(_) => ErrorCode::InternalError,
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ApplicationError::Chapter(e) => e.details(),
            ApplicationError::NotFound { resource_type, id } => {
                Some(serde_json::json!({ "resource": resource_type, "id": id }))
            }
            _ => None,
        }
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => Self::NotFound {
                resource_type: "Chapter",
                id,
            },
            RepositoryError::Duplicate(msg) | RepositoryError::Conflict(msg) => {
                Self::Conflict(msg)
            }
            other => Self::RepositoryError(other.to_string()),
        }
    }
}

impl From<SchedulerError> for ApplicationError {
    fn from(err: SchedulerError) -> Self {
        Self::ExternalServiceError(err.to_string())
    }
}
