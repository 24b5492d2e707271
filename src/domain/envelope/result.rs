//! Envelope - 统一结果信封

use serde::de::DeserializeOwned;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

use super::wire::normalize_value;
use super::ErrorCode;

/// 信封为空消息时 `extract` 使用的兜底消息
pub const FALLBACK_FAILURE_MESSAGE: &str = "Request failed";

/// 失败信封的错误体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorBody {
    pub fn new(code: ErrorCode) -> Self {
        Self {
            code,
            details: None,
        }
    }
}

/// 分页信息（列表查询时附带）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            total.div_ceil(limit as u64).min(u32::MAX as u64) as u32
        };
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }

    /// 当前页的起始偏移
    pub fn offset(&self) -> u64 {
        (self.page.saturating_sub(1) as u64) * self.limit as u64
    }
}

/// 可映射为错误码的错误
///
/// 各层错误实现该 trait 后即可通过 [`ResultEnvelope::from_result`] 包装
pub trait EnvelopeError: std::fmt::Display {
    fn error_code(&self) -> ErrorCode;

    fn details(&self) -> Option<Value> {
        None
    }
}

/// `extract` 失败时返回的错误
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct EnvelopeRejection {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<Value>,
}

/// 统一结果信封
///
/// 不变量:
/// - Success 必定携带 data
/// - Failure 必定携带错误码，且 message 非空
#[derive(Debug, Clone, PartialEq)]
pub enum ResultEnvelope<T> {
    Success {
        data: T,
        message: String,
        meta: Option<Pagination>,
    },
    Failure {
        error: ErrorBody,
        message: String,
        meta: Option<Pagination>,
    },
}

impl<T> ResultEnvelope<T> {
    /// 成功信封
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self::Success {
            data,
            message: message.into(),
            meta: None,
        }
    }

    /// 成功信封（空消息）
    pub fn ok(data: T) -> Self {
        Self::success(data, String::new())
    }

    /// 失败信封，空消息时使用错误码默认消息
    pub fn failure(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::failure_with_details(code, message, None)
    }

    pub fn failure_with_details(
        code: ErrorCode,
        message: impl Into<String>,
        details: Option<Value>,
    ) -> Self {
        let mut message = message.into();
        if message.trim().is_empty() {
            message = code.default_message().to_string();
        }
        Self::Failure {
            error: ErrorBody { code, details },
            message,
            meta: None,
        }
    }

    /// 由领域/应用层结果构造信封
    pub fn from_result<E: EnvelopeError>(result: Result<T, E>, message: impl Into<String>) -> Self {
        match result {
            Ok(data) => Self::success(data, message),
            Err(e) => Self::failure_with_details(e.error_code(), e.to_string(), e.details()),
        }
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        match &mut self {
            Self::Success { meta, .. } | Self::Failure { meta, .. } => *meta = Some(pagination),
        }
        self
    }

    /// Success 且 data 存在
    ///
    /// 类型化信封的 Success 总是携带 data；
    /// 来自上游的 `success: true, data: null` 在 [`normalize_value`] 中已被归类为失败。
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// 标签为 Failure
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Success { message, .. } | Self::Failure { message, .. } => message,
        }
    }

    pub fn meta(&self) -> Option<&Pagination> {
        match self {
            Self::Success { meta, .. } | Self::Failure { meta, .. } => meta.as_ref(),
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success { data, .. } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorBody> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error, .. } => Some(error),
        }
    }

    pub fn error_code(&self) -> Option<&ErrorCode> {
        self.error().map(|e| &e.code)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ResultEnvelope<U> {
        match self {
            Self::Success { data, message, meta } => ResultEnvelope::Success {
                data: f(data),
                message,
                meta,
            },
            Self::Failure {
                error,
                message,
                meta,
            } => ResultEnvelope::Failure {
                error,
                message,
                meta,
            },
        }
    }

    /// 取出 data，失败时转为错误
    ///
    /// 唯一会把 Failure 变成 `Err` 的操作，仅供没有恢复路径的调用点使用。
    pub fn extract(self) -> Result<T, EnvelopeRejection> {
        match self {
            Self::Success { data, .. } => Ok(data),
            Self::Failure { error, message, .. } => {
                let message = if message.trim().is_empty() {
                    FALLBACK_FAILURE_MESSAGE.to_string()
                } else {
                    message
                };
                Err(EnvelopeRejection {
                    code: error.code,
                    message,
                    details: error.details,
                })
            }
        }
    }

    /// 分派到恰好一个回调
    ///
    /// 成功时调用 `on_success` 并返回 data，失败时调用 `on_failure` 并返回 `None`。
    pub fn resolve(
        self,
        on_success: impl FnOnce(&T),
        on_failure: impl FnOnce(&ErrorBody, &str),
    ) -> Option<T> {
        match self {
            Self::Success { data, .. } => {
                on_success(&data);
                Some(data)
            }
            Self::Failure { error, message, .. } => {
                on_failure(&error, &message);
                None
            }
        }
    }
}

impl<T: Serialize> Serialize for ResultEnvelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = match self {
            Self::Success { meta, .. } => 3 + usize::from(meta.is_some()),
            Self::Failure { meta, .. } => 4 + usize::from(meta.is_some()),
        };
        let mut state = serializer.serialize_struct("ResultEnvelope", fields)?;
        match self {
            Self::Success { data, message, meta } => {
                state.serialize_field("success", &true)?;
                state.serialize_field("message", message)?;
                state.serialize_field("data", data)?;
                if let Some(meta) = meta {
                    state.serialize_field("meta", meta)?;
                }
            }
            Self::Failure {
                error,
                message,
                meta,
            } => {
                state.serialize_field("success", &false)?;
                state.serialize_field("message", message)?;
                state.serialize_field("data", &Option::<()>::None)?;
                state.serialize_field("error", error)?;
                if let Some(meta) = meta {
                    state.serialize_field("meta", meta)?;
                }
            }
        }
        state.end()
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for ResultEnvelope<T> {
    /// 任意形状的上游响应都会被规范化，畸形响应得到 INTERNAL_ERROR 失败信封
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(normalize_value(value))
    }
}
