//! Envelope Context - 统一结果信封
//!
//! 职责:
//! - 成功/失败严格区分的结果类型
//! - 错误码分类
//! - 上游响应规范化

mod error_code;
mod result;
mod wire;

pub use error_code::ErrorCode;
pub use result::{
    EnvelopeError, EnvelopeRejection, ErrorBody, Pagination, ResultEnvelope,
    FALLBACK_FAILURE_MESSAGE,
};
pub use wire::{normalize_str, normalize_value, WireEnvelope, WireError};
