//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping              GET   健康检查
//! - /api/chapter/draft     POST  创建草稿
//! - /api/chapter/autosave  POST  自动保存（字段级补丁）
//! - /api/chapter/publish   POST  发布（立即或定时）
//! - /api/chapter/get       POST  获取章节详情
//! - /api/chapter/list      POST  分页列出章节

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/api", api_routes())
        .fallback(handlers::fallback)
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/chapter", chapter_routes())
}

/// Chapter 路由
fn chapter_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/draft", post(handlers::create_draft))
        .route("/autosave", post(handlers::autosave))
        .route("/publish", post(handlers::publish))
        .route("/get", post(handlers::get_chapter))
        .route("/list", post(handlers::list_chapters))
}
