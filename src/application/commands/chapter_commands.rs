//! Chapter Commands

use serde_json::Value;

use crate::domain::chapter::{AutoSavePatch, ChapterId, PublishOptions};

/// 创建草稿命令
///
/// 原始输入在处理器中校验，不合法时返回 VALIDATION_ERROR 信封
#[derive(Debug, Clone)]
pub struct CreateDraft {
    pub novel_id: String,
    pub chapter_number: i64,
    pub title: String,
    pub content: String,
    pub content_structured: Option<Value>,
    pub author_note: Option<String>,
    pub thumbnail_url: Option<String>,
}

impl CreateDraft {
    pub fn new(
        novel_id: impl Into<String>,
        chapter_number: i64,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            novel_id: novel_id.into(),
            chapter_number,
            title: title.into(),
            content: content.into(),
            content_structured: None,
            author_note: None,
            thumbnail_url: None,
        }
    }
}

/// 自动保存命令
#[derive(Debug, Clone)]
pub struct AutoSaveChapter {
    pub chapter_id: ChapterId,
    pub patch: AutoSavePatch,
}

/// 发布命令
#[derive(Debug, Clone)]
pub struct PublishChapter {
    pub chapter_id: ChapterId,
    pub options: PublishOptions,
}
