//! Chapter HTTP Handlers

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use std::sync::Arc;

use crate::application::{
    ApplicationError, AutoSaveReceipt, ChapterListResponse, GetChapter, ListChapters,
    PublishChapter, PublishedChapter,
};
use crate::domain::chapter::ChapterDocument;
use crate::domain::envelope::ResultEnvelope;
use crate::infrastructure::http::dto::{
    AutoSaveRequest, CreateDraftRequest, GetChapterRequest, ListChaptersRequest, PublishRequest,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

type Body<T> = Result<Json<T>, JsonRejection>;

/// 创建草稿
/// POST /api/chapter/draft
pub async fn create_draft(
    State(state): State<Arc<AppState>>,
    payload: Body<CreateDraftRequest>,
) -> Result<ResultEnvelope<ChapterDocument>, ApiError> {
    let Json(req) = payload?;
    match req.into_command() {
        Ok(command) => Ok(state.create_draft_handler.handle(command).await),
        Err(e) => Ok(ResultEnvelope::from_result(Err(ApplicationError::from(e)), "")),
    }
}

/// 自动保存
/// POST /api/chapter/autosave
pub async fn autosave(
    State(state): State<Arc<AppState>>,
    payload: Body<AutoSaveRequest>,
) -> Result<ResultEnvelope<AutoSaveReceipt>, ApiError> {
    let Json(req) = payload?;
    Ok(state.autosave_handler.handle_json(req.id, &req.patch).await)
}

/// 发布（立即或定时）
/// POST /api/chapter/publish
pub async fn publish(
    State(state): State<Arc<AppState>>,
    payload: Body<PublishRequest>,
) -> Result<ResultEnvelope<PublishedChapter>, ApiError> {
    let Json(req) = payload?;
    Ok(state.publish_handler.handle(PublishChapter::from(req)).await)
}

/// 获取章节
/// POST /api/chapter/get
pub async fn get_chapter(
    State(state): State<Arc<AppState>>,
    payload: Body<GetChapterRequest>,
) -> Result<ResultEnvelope<ChapterDocument>, ApiError> {
    let Json(req) = payload?;
    Ok(state.get_chapter_handler.handle(GetChapter::from(req)).await)
}

/// 列出章节
/// POST /api/chapter/list
pub async fn list_chapters(
    State(state): State<Arc<AppState>>,
    payload: Body<ListChaptersRequest>,
) -> Result<ResultEnvelope<ChapterListResponse>, ApiError> {
    let Json(req) = payload?;
    Ok(state.list_chapters_handler.handle(ListChapters::from(req)).await)
}

/// 未知路由
pub async fn fallback() -> ApiError {
    ApiError::NotFound("No such endpoint".to_string())
}
