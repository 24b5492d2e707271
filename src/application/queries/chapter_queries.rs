//! Chapter Queries

use crate::domain::chapter::{ChapterId, ChapterStatus, SortOrder};

/// 获取章节详情查询
#[derive(Debug, Clone)]
pub struct GetChapter {
    pub chapter_id: ChapterId,
}

/// 列出小说章节查询
#[derive(Debug, Clone)]
pub struct ListChapters {
    pub novel_id: String,
    /// 页码（从 1 开始），缺省为第 1 页
    pub page: Option<u32>,
    /// 每页条数，缺省使用配置值
    pub limit: Option<u32>,
    pub order: SortOrder,
    pub status: Option<ChapterStatus>,
}

impl ListChapters {
    pub fn new(novel_id: impl Into<String>, page: u32, limit: u32) -> Self {
        Self {
            novel_id: novel_id.into(),
            page: Some(page),
            limit: Some(limit),
            order: SortOrder::Asc,
            status: None,
        }
    }
}
