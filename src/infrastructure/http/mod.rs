//! HTTP Layer - RESTful JSON API
//!
//! 每个响应体都是 `ResultEnvelope`

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use error::{status_for, ApiError};
pub use routes::create_routes;
pub use server::{HttpServer, ServerConfig};
pub use state::AppState;
