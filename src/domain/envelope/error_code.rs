//! Envelope - 错误码

use serde::{Deserialize, Serialize};

/// 统一错误码
///
/// 已知错误码为封闭集合，`Other` 用于承载当前版本未知的错误码，
/// 以原始字符串往返，不会导致解析失败。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ErrorCode {
    ValidationError,
    NotFound,
    Unauthorized,
    Forbidden,
    Conflict,
    InternalError,
    BadRequest,
    InvalidToken,
    ExpiredToken,
    Other(String),
}

impl ErrorCode {
    pub fn as_str(&self) -> &str {
        match self {
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::InternalError => "INTERNAL_ERROR",
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::InvalidToken => "INVALID_TOKEN",
            ErrorCode::ExpiredToken => "EXPIRED_TOKEN",
            ErrorCode::Other(code) => code,
        }
    }

    /// 默认错误消息，在调用方未提供消息时使用
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::Unauthorized => "Authentication required",
            ErrorCode::Forbidden => "Permission denied",
            ErrorCode::Conflict => "Resource state conflict",
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::BadRequest => "Malformed request",
            ErrorCode::InvalidToken => "Invalid token",
            ErrorCode::ExpiredToken => "Token expired",
            ErrorCode::Other(_) => "Request failed",
        }
    }

    /// 调用方不修改输入即可重试
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCode::InternalError)
    }

    /// 认证/授权类错误，引擎只透传
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            ErrorCode::Unauthorized
                | ErrorCode::Forbidden
                | ErrorCode::InvalidToken
                | ErrorCode::ExpiredToken
        )
    }
}

impl From<String> for ErrorCode {
    fn from(code: String) -> Self {
        match code.as_str() {
            "VALIDATION_ERROR" => ErrorCode::ValidationError,
            "NOT_FOUND" => ErrorCode::NotFound,
            "UNAUTHORIZED" => ErrorCode::Unauthorized,
            "FORBIDDEN" => ErrorCode::Forbidden,
            "CONFLICT" => ErrorCode::Conflict,
            "INTERNAL_ERROR" => ErrorCode::InternalError,
            "BAD_REQUEST" => ErrorCode::BadRequest,
            "INVALID_TOKEN" => ErrorCode::InvalidToken,
            "EXPIRED_TOKEN" => ErrorCode::ExpiredToken,
            _ => ErrorCode::Other(code),
        }
    }
}

impl From<&str> for ErrorCode {
    fn from(code: &str) -> Self {
        ErrorCode::from(code.to_string())
    }
}

impl From<ErrorCode> for String {
    fn from(code: ErrorCode) -> Self {
        match code {
            ErrorCode::Other(code) => code,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes_round_trip() {
        let json = serde_json::to_string(&ErrorCode::ExpiredToken).unwrap();
        assert_eq!(json, "\"EXPIRED_TOKEN\"");

        let code: ErrorCode = serde_json::from_str("\"CONFLICT\"").unwrap();
        assert_eq!(code, ErrorCode::Conflict);
    }

    #[test]
    fn test_unknown_code_is_opaque() {
        let code: ErrorCode = serde_json::from_str("\"RATE_LIMITED\"").unwrap();
        assert_eq!(code, ErrorCode::Other("RATE_LIMITED".to_string()));
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"RATE_LIMITED\"");
        assert!(!code.is_retryable());
    }

    #[test]
    fn test_auth_family() {
        assert!(ErrorCode::InvalidToken.is_auth());
        assert!(ErrorCode::Forbidden.is_auth());
        assert!(!ErrorCode::Conflict.is_auth());
    }
}
