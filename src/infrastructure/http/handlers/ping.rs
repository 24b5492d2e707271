//! Ping Handler
//!
//! 健康检查

use crate::domain::envelope::ResultEnvelope;
use crate::infrastructure::http::dto::PingResponse;

/// Ping endpoint - 健康检查
pub async fn ping() -> ResultEnvelope<PingResponse> {
    ResultEnvelope::success(
        PingResponse {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        },
        "pong",
    )
}
