//! Chapter Query Handlers

use serde::Serialize;
use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{ChapterListQuery, ChapterRepositoryPort};
use crate::application::queries::{GetChapter, ListChapters};
use crate::domain::chapter::{ChapterDocument, ChapterListItem, NovelId};
use crate::domain::envelope::{Pagination, ResultEnvelope};

/// 默认每页条数
pub const DEFAULT_PAGE_SIZE: u32 = 20;
/// 每页条数上限
pub const MAX_PAGE_SIZE: u32 = 100;

// ============================================================================
// Response DTOs
// ============================================================================

/// 章节列表响应
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChapterListResponse {
    pub items: Vec<ChapterListItem>,
    pub pagination: Pagination,
}

/// 分页限制
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_limit: u32,
    pub max_limit: u32,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_PAGE_SIZE,
            max_limit: MAX_PAGE_SIZE,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GetChapter Handler
pub struct GetChapterHandler {
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl GetChapterHandler {
    pub fn new(chapter_repo: Arc<dyn ChapterRepositoryPort>) -> Self {
        Self { chapter_repo }
    }

    pub async fn handle(&self, query: GetChapter) -> ResultEnvelope<ChapterDocument> {
        let result = self
            .chapter_repo
            .find_by_id(query.chapter_id)
            .await
            .map_err(ApplicationError::from)
            .and_then(|chapter| {
                chapter.ok_or_else(|| ApplicationError::not_found("Chapter", query.chapter_id))
            });

        ResultEnvelope::from_result(result, "")
    }
}

/// ListChapters Handler
pub struct ListChaptersHandler {
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
    limits: PageLimits,
}

impl ListChaptersHandler {
    pub fn new(chapter_repo: Arc<dyn ChapterRepositoryPort>, limits: PageLimits) -> Self {
        Self {
            chapter_repo,
            limits,
        }
    }

    pub async fn handle(&self, query: ListChapters) -> ResultEnvelope<ChapterListResponse> {
        match self.try_handle(query).await {
            Ok(response) => {
                let pagination = response.pagination;
                ResultEnvelope::ok(response).with_pagination(pagination)
            }
            Err(e) => ResultEnvelope::from_result(Err(e), ""),
        }
    }

    async fn try_handle(&self, query: ListChapters) -> Result<ChapterListResponse, ApplicationError> {
        let novel_id = NovelId::new(query.novel_id)?;

        let page = query.page.unwrap_or(1);
        if page == 0 {
            return Err(ApplicationError::validation("page must be at least 1"));
        }
        let limit = query.limit.unwrap_or(self.limits.default_limit);
        if limit == 0 {
            return Err(ApplicationError::validation("limit must be at least 1"));
        }
        let limit = limit.min(self.limits.max_limit);

        let mut pagination = Pagination::new(page, limit, 0);
        let result = self
            .chapter_repo
            .list_by_novel(&ChapterListQuery {
                novel_id,
                status: query.status,
                order: query.order,
                offset: pagination.offset(),
                limit,
            })
            .await?;
        pagination = Pagination::new(page, limit, result.total);

        let mut items = result.items;
        items.truncate(limit as usize);

        Ok(ChapterListResponse { items, pagination })
    }
}
