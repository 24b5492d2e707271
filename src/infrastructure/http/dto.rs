//! Data Transfer Objects
//!
//! 请求体字段使用 camelCase，与章节文档的线上格式一致

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::{CreateDraft, GetChapter, ListChapters, PublishChapter};
use crate::domain::chapter::{ChapterError, ChapterId, ChapterStatus, PublishOptions, SortOrder};

// ============================================================================
// Chapter DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDraftRequest {
    /// 缺失字段由领域校验返回 VALIDATION_ERROR，而不是 BAD_REQUEST
    #[serde(default)]
    pub novel_id: String,
    /// 保留原始 JSON 值，错误信息中回显
    #[serde(default)]
    pub chapter_number: Value,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub content_structured: Option<Value>,
    #[serde(default)]
    pub author_note: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

impl CreateDraftRequest {
    /// 非整数的序号直接返回 `InvalidChapterNumber`，其余字段交给领域校验
    pub fn into_command(self) -> Result<CreateDraft, ChapterError> {
        let chapter_number = self
            .chapter_number
            .as_i64()
            .ok_or_else(|| ChapterError::InvalidChapterNumber(self.chapter_number.to_string()))?;

        Ok(CreateDraft {
            novel_id: self.novel_id,
            chapter_number,
            title: self.title,
            content: self.content,
            content_structured: self.content_structured,
            author_note: self.author_note,
            thumbnail_url: self.thumbnail_url,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct AutoSaveRequest {
    pub id: ChapterId,
    pub patch: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishRequest {
    pub id: ChapterId,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl From<PublishRequest> for PublishChapter {
    fn from(req: PublishRequest) -> Self {
        PublishChapter {
            chapter_id: req.id,
            options: PublishOptions {
                is_public: req.is_public,
                scheduled_at: req.scheduled_at,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GetChapterRequest {
    pub id: ChapterId,
}

impl From<GetChapterRequest> for GetChapter {
    fn from(req: GetChapterRequest) -> Self {
        GetChapter { chapter_id: req.id }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListChaptersRequest {
    pub novel_id: String,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub order: SortOrder,
    #[serde(default)]
    pub status: Option<ChapterStatus>,
}

impl From<ListChaptersRequest> for ListChapters {
    /// 越界的页码和条数折算为 0，由查询处理器返回 VALIDATION_ERROR
    fn from(req: ListChaptersRequest) -> Self {
        ListChapters {
            novel_id: req.novel_id,
            page: req.page.map(to_u32),
            limit: req.limit.map(to_u32),
            order: req.order,
            status: req.status,
        }
    }
}

fn to_u32(n: i64) -> u32 {
    if n < 1 {
        0
    } else {
        u32::try_from(n).unwrap_or(u32::MAX)
    }
}

// ============================================================================
// Ping
// ============================================================================

/// Ping 响应
#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_draft_request_reports_raw_number() {
        for (raw, shown) in [(json!(1.5), "1.5"), (json!(2.0), "2.0"), (json!("3"), "\"3\"")] {
            let req: CreateDraftRequest = serde_json::from_value(json!({
                "novelId": "novel-1",
                "chapterNumber": raw,
                "title": "One"
            }))
            .unwrap();
            let err = req.into_command().unwrap_err();
            assert_eq!(err, ChapterError::InvalidChapterNumber(shown.to_string()));
            assert!(err.to_string().ends_with(&format!("got {}", shown)));
        }
    }

    #[test]
    fn test_create_draft_request_missing_fields_reach_validation() {
        let req: CreateDraftRequest = serde_json::from_value(json!({
            "chapterNumber": 4
        }))
        .unwrap();
        let command = req.into_command().unwrap();
        assert_eq!(command.chapter_number, 4);
        assert_eq!(command.novel_id, "");
        assert_eq!(command.title, "");
        assert_eq!(command.content, "");

        let missing: CreateDraftRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(
            missing.into_command().unwrap_err(),
            ChapterError::InvalidChapterNumber("null".to_string())
        );
    }

    #[test]
    fn test_list_request_bounds() {
        let req: ListChaptersRequest = serde_json::from_value(json!({
            "novelId": "novel-1",
            "page": -3,
            "limit": 10_000_000_000_i64,
            "order": "desc",
            "status": "draft"
        }))
        .unwrap();
        let query = ListChapters::from(req);
        assert_eq!(query.page, Some(0));
        assert_eq!(query.limit, Some(u32::MAX));
        assert_eq!(query.order, SortOrder::Desc);
        assert_eq!(query.status, Some(ChapterStatus::Draft));
    }

    #[test]
    fn test_publish_request_defaults() {
        let req: PublishRequest = serde_json::from_value(json!({
            "id": "6f2c1b8e-8f43-4b0e-9a53-4d3c2f1e0a11"
        }))
        .unwrap();
        let command = PublishChapter::from(req);
        assert!(!command.options.is_public);
        assert!(command.options.scheduled_at.is_none());
    }
}
