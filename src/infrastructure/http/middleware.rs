//! HTTP Middleware
//!
//! 按状态码记录失败请求

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

/// 失败请求日志中间件
///
/// 5xx 记为 error，4xx 记为 warn；信封的错误码在 `ResultEnvelope::into_response` 中记录
pub async fn error_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            uri = %uri,
            status = status.as_u16(),
            elapsed_ms,
            "HTTP server error"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            uri = %uri,
            status = status.as_u16(),
            elapsed_ms,
            "HTTP client error"
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        routing::get,
        Router,
    };
    use tower::util::ServiceExt;

    use crate::domain::envelope::{ErrorCode, ResultEnvelope};

    async fn ok_handler() -> ResultEnvelope<&'static str> {
        ResultEnvelope::ok("fine")
    }

    async fn conflict_handler() -> ResultEnvelope<()> {
        ResultEnvelope::failure(ErrorCode::Conflict, "already published")
    }

    async fn internal_handler() -> ResultEnvelope<()> {
        ResultEnvelope::failure(ErrorCode::InternalError, "")
    }

    fn create_test_router() -> Router {
        Router::new()
            .route("/ok", get(ok_handler))
            .route("/conflict", get(conflict_handler))
            .route("/internal", get(internal_handler))
            .layer(axum::middleware::from_fn(error_logging_middleware))
    }

    async fn status_of(uri: &str) -> StatusCode {
        let request = HttpRequest::builder().uri(uri).body(Body::empty()).unwrap();
        create_test_router().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_middleware_passes_responses_through() {
        assert_eq!(status_of("/ok").await, StatusCode::OK);
        assert_eq!(status_of("/conflict").await, StatusCode::CONFLICT);
        assert_eq!(status_of("/internal").await, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
