//! Envelope - 上游响应的线上格式与规范化
//!
//! 传输层交来的原始响应可能缺少 `success` 标记，或者标记成功却没有 `data`。
//! 这里按原样解析，再统一规范化为 [`ResultEnvelope`]。

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ErrorCode, Pagination, ResultEnvelope};

const MISSING_DATA_MESSAGE: &str = "Malformed response: success flagged without data";
const MISSING_FLAG_MESSAGE: &str = "Malformed response: missing success flag";
const NOT_AN_OBJECT_MESSAGE: &str = "Malformed response: expected a JSON object";

/// 线上错误体，所有字段都可能缺失
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireError {
    #[serde(default)]
    pub code: Option<ErrorCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// 原始线上信封 `{ success, message, data, error?, meta? }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireEnvelope<T> {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<WireError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Pagination>,
}

impl<T> WireEnvelope<T> {
    /// 标记成功且 data 非空
    pub fn is_success(&self) -> bool {
        self.success == Some(true) && self.data.is_some()
    }

    /// 标记失败
    ///
    /// 不是 `is_success` 的取反：`success: true, data: null` 两个谓词都不成立。
    pub fn is_failure(&self) -> bool {
        self.success == Some(false)
    }

    /// 规范化为类型化信封，畸形响应归类为 INTERNAL_ERROR
    pub fn into_envelope(self) -> ResultEnvelope<T> {
        let message = self.message.unwrap_or_default();
        let envelope = match (self.success, self.data) {
            (Some(true), Some(data)) => ResultEnvelope::success(data, message),
            (Some(true), None) => {
                tracing::warn!(message = %message, "Upstream success response without data");
                ResultEnvelope::failure(ErrorCode::InternalError, MISSING_DATA_MESSAGE)
            }
            (Some(false), _) => {
                let error = self.error.unwrap_or_default();
                ResultEnvelope::failure_with_details(
                    error.code.unwrap_or(ErrorCode::InternalError),
                    message,
                    error.details,
                )
            }
            (None, _) => {
                tracing::warn!(message = %message, "Upstream response without success flag");
                match self.error {
                    Some(WireError {
                        code: Some(code),
                        details,
                    }) => ResultEnvelope::failure_with_details(code, message, details),
                    _ => ResultEnvelope::failure(ErrorCode::InternalError, MISSING_FLAG_MESSAGE),
                }
            }
        };
        match self.meta {
            Some(meta) => envelope.with_pagination(meta),
            None => envelope,
        }
    }
}

impl<T> From<ResultEnvelope<T>> for WireEnvelope<T> {
    fn from(envelope: ResultEnvelope<T>) -> Self {
        match envelope {
            ResultEnvelope::Success { data, message, meta } => Self {
                success: Some(true),
                message: Some(message),
                data: Some(data),
                error: None,
                meta,
            },
            ResultEnvelope::Failure {
                error,
                message,
                meta,
            } => Self {
                success: Some(false),
                message: Some(message),
                data: None,
                error: Some(WireError {
                    code: Some(error.code),
                    details: error.details,
                }),
                meta,
            },
        }
    }
}

/// 将任意 JSON 规范化为类型化信封
pub fn normalize_value<T: DeserializeOwned>(value: Value) -> ResultEnvelope<T> {
    if !value.is_object() {
        return ResultEnvelope::failure(ErrorCode::InternalError, NOT_AN_OBJECT_MESSAGE);
    }

    let wire: WireEnvelope<Value> = match serde_json::from_value(value) {
        Ok(wire) => wire,
        Err(e) => {
            return ResultEnvelope::failure(
                ErrorCode::InternalError,
                format!("Malformed response: {}", e),
            )
        }
    };

    match wire.into_envelope() {
        ResultEnvelope::Success { data, message, meta } => {
            match serde_json::from_value::<T>(data) {
                Ok(data) => ResultEnvelope::Success { data, message, meta },
                Err(e) => ResultEnvelope::failure(
                    ErrorCode::InternalError,
                    format!("Malformed response data: {}", e),
                ),
            }
        }
        ResultEnvelope::Failure {
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

/// 解析原始响应文本
pub fn normalize_str<T: DeserializeOwned>(raw: &str) -> ResultEnvelope<T> {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => normalize_value(value),
        Err(e) => ResultEnvelope::failure(
            ErrorCode::InternalError,
            format!("Malformed response: {}", e),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Item {
        id: u32,
    }

    #[test]
    fn test_well_formed_predicates_are_exclusive() {
        let ok: WireEnvelope<Value> =
            serde_json::from_value(json!({"success": true, "message": "", "data": {"id": 1}}))
                .unwrap();
        assert!(ok.is_success());
        assert!(!ok.is_failure());

        let failed: WireEnvelope<Value> = serde_json::from_value(json!({
            "success": false,
            "message": "nope",
            "data": null,
            "error": {"code": "FORBIDDEN"}
        }))
        .unwrap();
        assert!(!failed.is_success());
        assert!(failed.is_failure());
    }

    #[test]
    fn test_success_without_data_is_neither() {
        let wire: WireEnvelope<Value> =
            serde_json::from_value(json!({"success": true, "message": "ok", "data": null}))
                .unwrap();
        assert!(!wire.is_success());
        assert!(!wire.is_failure());

        let envelope = wire.into_envelope();
        assert_eq!(envelope.error_code(), Some(&ErrorCode::InternalError));
        assert!(!envelope.message().is_empty());
    }

    #[test]
    fn test_normalize_typed_success() {
        let envelope: ResultEnvelope<Item> =
            normalize_value(json!({"success": true, "message": "hi", "data": {"id": 9}}));
        assert_eq!(envelope.data(), Some(&Item { id: 9 }));
        assert_eq!(envelope.message(), "hi");
    }

    #[test]
    fn test_normalize_missing_flag() {
        let envelope: ResultEnvelope<Item> = normalize_value(json!({"data": {"id": 1}}));
        assert_eq!(envelope.error_code(), Some(&ErrorCode::InternalError));

        let envelope: ResultEnvelope<Item> = normalize_value(json!({
            "message": "token expired",
            "error": {"code": "EXPIRED_TOKEN"}
        }));
        assert_eq!(envelope.error_code(), Some(&ErrorCode::ExpiredToken));
        assert_eq!(envelope.message(), "token expired");
    }

    #[test]
    fn test_normalize_undecodable_data() {
        let envelope: ResultEnvelope<Item> =
            normalize_value(json!({"success": true, "data": {"id": "not-a-number"}}));
        assert_eq!(envelope.error_code(), Some(&ErrorCode::InternalError));
    }

    #[test]
    fn test_normalize_failure_passes_codes_through() {
        let envelope: ResultEnvelope<Item> = normalize_value(json!({
            "success": false,
            "message": "",
            "data": null,
            "error": {"code": "QUOTA_EXCEEDED", "details": {"limit": 3}}
        }));
        let error = envelope.error().unwrap();
        assert_eq!(error.code, ErrorCode::Other("QUOTA_EXCEEDED".to_string()));
        assert_eq!(error.details, Some(json!({"limit": 3})));
        assert_eq!(envelope.message(), "Request failed");
    }

    #[test]
    fn test_normalize_non_object() {
        let envelope: ResultEnvelope<Item> = normalize_str("[1, 2, 3]");
        assert!(envelope.is_failure());
        let envelope: ResultEnvelope<Item> = normalize_str("<html>");
        assert!(envelope.is_failure());
    }

    #[test]
    fn test_deserialize_typed_envelope_keeps_meta() {
        let envelope: ResultEnvelope<Vec<Item>> = serde_json::from_value(json!({
            "success": true,
            "message": "",
            "data": [{"id": 1}],
            "meta": {"page": 1, "limit": 20, "total": 1, "totalPages": 1}
        }))
        .unwrap();
        assert_eq!(envelope.meta(), Some(&Pagination::new(1, 20, 1)));
    }
}
