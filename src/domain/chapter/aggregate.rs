//! Chapter Context - Aggregate Root

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

use super::{
    AutoSavePatch, ChapterError, ChapterId, ChapterNumber, ChapterStatus, ChapterTitle, NovelId,
};
use crate::domain::content_metrics::measure;

/// 章节文档聚合根
///
/// 不变量:
/// - wordCount / charCount 总是由 content 计算得出
/// - createdAt 创建后不变，publishedAt 只在 Draft → Published 时设置一次
/// - Published 为终态，引擎内没有撤回发布
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "ChapterSnapshot")]
pub struct ChapterDocument {
    id: Option<ChapterId>,
    novel_id: NovelId,
    chapter_number: ChapterNumber,
    title: ChapterTitle,
    content: String,
    content_structured: Option<Value>,
    word_count: u32,
    char_count: u32,
    status: ChapterStatus,
    is_public: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    published_at: Option<DateTime<Utc>>,
    author_note: Option<String>,
    thumbnail_url: Option<String>,
}

/// 章节文档的完整字段快照
///
/// 用于反序列化和从存储恢复；统计字段只作提示，转换时重新计算。
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterSnapshot {
    #[serde(default)]
    pub id: Option<ChapterId>,
    pub novel_id: NovelId,
    pub chapter_number: ChapterNumber,
    pub title: ChapterTitle,
    pub content: String,
    #[serde(default)]
    pub content_structured: Option<Value>,
    #[serde(default)]
    pub word_count: Option<u32>,
    #[serde(default)]
    pub char_count: Option<u32>,
    pub status: ChapterStatus,
    #[serde(default)]
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub author_note: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

impl From<ChapterSnapshot> for ChapterDocument {
    fn from(snapshot: ChapterSnapshot) -> Self {
        let mut document = Self {
            id: snapshot.id,
            novel_id: snapshot.novel_id,
            chapter_number: snapshot.chapter_number,
            title: snapshot.title,
            content: snapshot.content,
            content_structured: snapshot.content_structured,
            word_count: snapshot.word_count.unwrap_or_default(),
            char_count: snapshot.char_count.unwrap_or_default(),
            status: snapshot.status,
            is_public: snapshot.is_public,
            created_at: snapshot.created_at,
            updated_at: snapshot.updated_at,
            published_at: snapshot.published_at,
            author_note: snapshot.author_note,
            thumbnail_url: snapshot.thumbnail_url,
        };
        document.recompute_metrics();
        document
    }
}

/// 发布选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishOptions {
    pub is_public: bool,
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl PublishOptions {
    pub fn immediate(is_public: bool) -> Self {
        Self {
            is_public,
            scheduled_at: None,
        }
    }

    pub fn scheduled(is_public: bool, scheduled_at: DateTime<Utc>) -> Self {
        Self {
            is_public,
            scheduled_at: Some(scheduled_at),
        }
    }
}

/// 发布结果
#[derive(Debug, Clone, PartialEq)]
pub enum PublishOutcome {
    /// 已立即发布
    Published(ChapterDocument),
    /// 计划在未来发布，文档未改变，由外部调度方执行
    Scheduled {
        chapter: ChapterDocument,
        scheduled_at: DateTime<Utc>,
        is_public: bool,
    },
}

impl ChapterDocument {
    /// 创建新草稿
    pub fn new_draft(
        novel_id: NovelId,
        chapter_number: ChapterNumber,
        title: ChapterTitle,
        content: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let mut document = Self {
            id: None,
            novel_id,
            chapter_number,
            title,
            content: content.into(),
            content_structured: None,
            word_count: 0,
            char_count: 0,
            status: ChapterStatus::Draft,
            is_public: false,
            created_at: now,
            updated_at: now,
            published_at: None,
            author_note: None,
            thumbnail_url: None,
        };
        document.recompute_metrics();
        document
    }

    pub fn with_content_structured(mut self, content_structured: Option<Value>) -> Self {
        self.content_structured = content_structured;
        self
    }

    pub fn with_author_note(mut self, author_note: Option<String>) -> Self {
        self.author_note = author_note;
        self
    }

    pub fn with_thumbnail_url(mut self, thumbnail_url: Option<String>) -> Self {
        self.thumbnail_url = thumbnail_url;
        self
    }

    /// 首次持久化时由存储分配 ID
    pub fn with_id(mut self, id: ChapterId) -> Self {
        self.id = Some(id);
        self
    }

    /// 应用自动保存补丁
    ///
    /// 只修改补丁中出现的字段，状态保持不变；同一补丁重复应用结果相同。
    pub fn apply_patch(&mut self, patch: &AutoSavePatch, now: DateTime<Utc>) {
        if let Some(content) = patch.content() {
            self.content = content.to_string();
        }
        if let Some(content_structured) = patch.content_structured() {
            self.content_structured = content_structured.cloned();
        }
        if let Some(title) = patch.title() {
            self.title = title.clone();
        }
        if let Some(author_note) = patch.author_note() {
            self.author_note = author_note.map(str::to_string);
        }
        if let Some(thumbnail_url) = patch.thumbnail_url() {
            self.thumbnail_url = thumbnail_url.map(str::to_string);
        }
        self.recompute_metrics();
        self.updated_at = now;
    }

    /// 发布
    ///
    /// 已发布时返回 `AlreadyPublished`，不修改自身。
    /// `scheduled_at` 晚于 `now` 时只返回发布意图。
    pub fn publish(
        &self,
        options: &PublishOptions,
        now: DateTime<Utc>,
    ) -> Result<PublishOutcome, ChapterError> {
        if self.status == ChapterStatus::Published {
            return Err(ChapterError::AlreadyPublished(self.chapter_number));
        }

        if let Some(scheduled_at) = options.scheduled_at.filter(|at| *at > now) {
            return Ok(PublishOutcome::Scheduled {
                chapter: self.clone(),
                scheduled_at,
                is_public: options.is_public,
            });
        }

        let mut published = self.clone();
        published.mark_published(options.is_public, now)?;
        published.recompute_metrics();
        Ok(PublishOutcome::Published(published))
    }

    /// 就地切换为已发布，只写 status / isPublic / publishedAt / updatedAt
    ///
    /// 仓储在持有记录锁时调用，保证 publishedAt 只写一次
    pub fn mark_published(&mut self, is_public: bool, now: DateTime<Utc>) -> Result<(), ChapterError> {
        if self.status == ChapterStatus::Published {
            return Err(ChapterError::AlreadyPublished(self.chapter_number));
        }
        self.status = ChapterStatus::Published;
        self.is_public = is_public;
        self.published_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    fn recompute_metrics(&mut self) {
        let metrics = measure(&self.content);
        self.word_count = metrics.word_count;
        self.char_count = metrics.char_count;
    }

    /// 读者实际可见：必须已发布且公开
    pub fn is_effectively_public(&self) -> bool {
        self.status == ChapterStatus::Published && self.is_public
    }

    /// 列表投影（不含正文）
    pub fn to_list_item(&self) -> ChapterListItem {
        ChapterListItem {
            id: self.id,
            chapter_number: self.chapter_number,
            title: self.title.clone(),
            word_count: self.word_count,
            status: self.status,
            published_at: self.published_at,
            updated_at: self.updated_at,
        }
    }

    // Getters
    pub fn id(&self) -> Option<ChapterId> {
        self.id
    }

    pub fn novel_id(&self) -> &NovelId {
        &self.novel_id
    }

    pub fn chapter_number(&self) -> ChapterNumber {
        self.chapter_number
    }

    pub fn title(&self) -> &ChapterTitle {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn content_structured(&self) -> Option<&Value> {
        self.content_structured.as_ref()
    }

    pub fn word_count(&self) -> u32 {
        self.word_count
    }

    pub fn char_count(&self) -> u32 {
        self.char_count
    }

    pub fn status(&self) -> ChapterStatus {
        self.status
    }

    pub fn is_public(&self) -> bool {
        self.is_public
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }

    pub fn author_note(&self) -> Option<&str> {
        self.author_note.as_deref()
    }

    pub fn thumbnail_url(&self) -> Option<&str> {
        self.thumbnail_url.as_deref()
    }
}

/// 列表排序方向（按章节序号）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// 章节列表项（读投影）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterListItem {
    pub id: Option<ChapterId>,
    pub chapter_number: ChapterNumber,
    pub title: ChapterTitle,
    pub word_count: u32,
    pub status: ChapterStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl ChapterListItem {
    /// 列表排序：章节序号按方向排序，序号相同时 updatedAt 升序（旧的在前）
    pub fn compare(a: &Self, b: &Self, order: SortOrder) -> Ordering {
        let by_number = match order {
            SortOrder::Asc => a.chapter_number.cmp(&b.chapter_number),
            SortOrder::Desc => b.chapter_number.cmp(&a.chapter_number),
        };
        by_number.then_with(|| a.updated_at.cmp(&b.updated_at))
    }
}
