//! Repository Ports - 出站端口
//!
//! 定义数据持久化的抽象接口
//! 具体实现在 infrastructure 层（SQLite / 内存）

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::chapter::{
    AutoSavePatch, ChapterDocument, ChapterId, ChapterListItem, ChapterNumber, ChapterStatus,
    NovelId, SortOrder,
};

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    /// 条件写入时记录状态已变化
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

// ============================================================================
// Chapter Repository
// ============================================================================

/// 章节列表查询条件
#[derive(Debug, Clone)]
pub struct ChapterListQuery {
    pub novel_id: NovelId,
    pub status: Option<ChapterStatus>,
    pub order: SortOrder,
    pub offset: u64,
    pub limit: u32,
}

/// 章节列表分页结果
#[derive(Debug, Clone)]
pub struct ChapterPage {
    pub items: Vec<ChapterListItem>,
    /// 满足条件的总数（不受分页影响）
    pub total: u64,
}

/// Chapter Repository Port
///
/// `(novel_id, chapter_number)` 唯一，冲突时返回 `RepositoryError::Duplicate`
#[async_trait]
pub trait ChapterRepositoryPort: Send + Sync {
    /// 插入新章节，分配并返回带 ID 的文档
    async fn insert(&self, chapter: &ChapterDocument) -> Result<ChapterDocument, RepositoryError>;

    /// 根据 ID 查找章节
    async fn find_by_id(&self, id: ChapterId) -> Result<Option<ChapterDocument>, RepositoryError>;

    /// 根据小说和章节序号查找
    async fn find_by_number(
        &self,
        novel_id: &NovelId,
        chapter_number: ChapterNumber,
    ) -> Result<Option<ChapterDocument>, RepositoryError>;

    /// 草稿转为已发布，只写 status / isPublic / publishedAt / updatedAt
    ///
    /// 存储中的记录已不是草稿时返回 `RepositoryError::Conflict`，不做任何修改。
    /// 返回写入后的完整文档（包含并发自动保存的内容）。
    async fn mark_published(
        &self,
        chapter: &ChapterDocument,
    ) -> Result<ChapterDocument, RepositoryError>;

    /// 只写入补丁涉及的字段（以及统计与 updatedAt）
    ///
    /// 并发自动保存按字段最后写入者获胜
    async fn save_patch(
        &self,
        chapter: &ChapterDocument,
        patch: &AutoSavePatch,
    ) -> Result<(), RepositoryError>;

    /// 分页列出小说下的章节
    async fn list_by_novel(&self, query: &ChapterListQuery) -> Result<ChapterPage, RepositoryError>;
}
