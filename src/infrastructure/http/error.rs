//! HTTP Error Handling
//!
//! 所有响应体都是 `ResultEnvelope`，HTTP 状态码由错误码决定

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::domain::envelope::{ErrorCode, ResultEnvelope};

/// 错误码对应的 HTTP 状态码
pub fn status_for(code: &ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationError => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Unauthorized | ErrorCode::InvalidToken | ErrorCode::ExpiredToken => {
            StatusCode::UNAUTHORIZED
        }
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::InternalError | ErrorCode::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl<T: Serialize> IntoResponse for ResultEnvelope<T> {
    fn into_response(self) -> Response {
        let status = match self.error_code() {
            None => StatusCode::OK,
            Some(code) => {
                let status = status_for(code);
                if status.is_server_error() {
                    tracing::error!(code = %code, error = %self.message(), "Request failed");
                } else {
                    tracing::warn!(code = %code, error = %self.message(), "Request rejected");
                }
                status
            }
        };

        (status, Json(self)).into_response()
    }
}

/// API 错误（请求未能到达处理器）
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let envelope = match self {
            ApiError::BadRequest(msg) => ResultEnvelope::<()>::failure(ErrorCode::BadRequest, msg),
            ApiError::NotFound(msg) => ResultEnvelope::<()>::failure(ErrorCode::NotFound, msg),
        };
        envelope.into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(&ErrorCode::ValidationError), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(status_for(&ErrorCode::Conflict), StatusCode::CONFLICT);
        assert_eq!(status_for(&ErrorCode::ExpiredToken), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_for(&ErrorCode::Other("RATE_LIMITED".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_envelope_response_status() {
        let ok = ResultEnvelope::ok(1).into_response();
        assert_eq!(ok.status(), StatusCode::OK);

        let missing = ResultEnvelope::<()>::failure(ErrorCode::NotFound, "").into_response();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let bad = ApiError::BadRequest("expected value".into()).into_response();
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
    }
}
