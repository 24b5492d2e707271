//! In-Memory Chapter Repository Implementation

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::application::ports::{
    ChapterListQuery, ChapterPage, ChapterRepositoryPort, RepositoryError,
};
use crate::domain::chapter::{
    AutoSavePatch, ChapterDocument, ChapterId, ChapterListItem, ChapterNumber, NovelId,
};

/// 内存章节仓储
///
/// `numbers` 索引保证 `(novel_id, chapter_number)` 唯一
pub struct InMemoryChapterRepository {
    chapters: DashMap<ChapterId, ChapterDocument>,
    numbers: DashMap<(NovelId, ChapterNumber), ChapterId>,
}

impl InMemoryChapterRepository {
    pub fn new() -> Self {
        Self {
            chapters: DashMap::new(),
            numbers: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }
}

impl Default for InMemoryChapterRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn require_id(chapter: &ChapterDocument) -> Result<ChapterId, RepositoryError> {
    chapter
        .id()
        .ok_or_else(|| RepositoryError::NotFound("chapter without id".to_string()))
}

#[async_trait]
impl ChapterRepositoryPort for InMemoryChapterRepository {
    async fn insert(&self, chapter: &ChapterDocument) -> Result<ChapterDocument, RepositoryError> {
        let id = chapter.id().unwrap_or_default();
        let key = (chapter.novel_id().clone(), chapter.chapter_number());

        match self.numbers.entry(key) {
            Entry::Occupied(_) => Err(RepositoryError::Duplicate(format!(
                "chapter {} of novel {}",
                chapter.chapter_number(),
                chapter.novel_id()
            ))),
            Entry::Vacant(slot) => {
                let stored = chapter.clone().with_id(id);
                self.chapters.insert(id, stored.clone());
                slot.insert(id);
                Ok(stored)
            }
        }
    }

    async fn find_by_id(&self, id: ChapterId) -> Result<Option<ChapterDocument>, RepositoryError> {
        Ok(self.chapters.get(&id).map(|c| c.clone()))
    }

    async fn find_by_number(
        &self,
        novel_id: &NovelId,
        chapter_number: ChapterNumber,
    ) -> Result<Option<ChapterDocument>, RepositoryError> {
        let id = match self.numbers.get(&(novel_id.clone(), chapter_number)) {
            Some(id) => *id,
            None => return Ok(None),
        };
        self.find_by_id(id).await
    }

    async fn mark_published(
        &self,
        chapter: &ChapterDocument,
    ) -> Result<ChapterDocument, RepositoryError> {
        let id = require_id(chapter)?;
        let published_at = chapter.published_at().unwrap_or_else(|| chapter.updated_at());
        let mut stored = self
            .chapters
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;
        stored
            .mark_published(chapter.is_public(), published_at)
            .map_err(|e| RepositoryError::Conflict(e.to_string()))?;
        Ok(stored.clone())
    }

    async fn save_patch(
        &self,
        chapter: &ChapterDocument,
        patch: &AutoSavePatch,
    ) -> Result<(), RepositoryError> {
        let id = require_id(chapter)?;
        let mut stored = self
            .chapters
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;
        stored.apply_patch(patch, chapter.updated_at());
        Ok(())
    }

    async fn list_by_novel(&self, query: &ChapterListQuery) -> Result<ChapterPage, RepositoryError> {
        let mut items: Vec<ChapterListItem> = self
            .chapters
            .iter()
            .filter(|entry| entry.novel_id() == &query.novel_id)
            .filter(|entry| query.status.map_or(true, |s| entry.status() == s))
            .map(|entry| entry.to_list_item())
            .collect();

        items.sort_by(|a, b| {
            ChapterListItem::compare(a, b, query.order).then_with(|| a.id.cmp(&b.id))
        });

        let total = items.len() as u64;
        let items = items
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .collect();

        Ok(ChapterPage { items, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chapter::{ChapterStatus, ChapterTitle, PublishOptions, PublishOutcome, SortOrder};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn at(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 1, 9, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    fn draft(novel: &str, number: i64, content: &str) -> ChapterDocument {
        ChapterDocument::new_draft(
            NovelId::new(novel).unwrap(),
            ChapterNumber::new(number).unwrap(),
            ChapterTitle::new(format!("Chapter {}", number)).unwrap(),
            content,
            at(0),
        )
    }

    fn query(novel: &str, order: SortOrder) -> ChapterListQuery {
        ChapterListQuery {
            novel_id: NovelId::new(novel).unwrap(),
            status: None,
            order,
            offset: 0,
            limit: 50,
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_rejects_duplicate_number() {
        let repo = InMemoryChapterRepository::new();

        let stored = repo.insert(&draft("novel-1", 1, "one")).await.unwrap();
        assert!(stored.id().is_some());

        let err = repo.insert(&draft("novel-1", 1, "again")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Duplicate(_)));

        // 其他小说可以使用同一序号
        repo.insert(&draft("novel-2", 1, "other")).await.unwrap();
        assert_eq!(repo.len(), 2);

        let found = repo
            .find_by_number(&NovelId::new("novel-1").unwrap(), ChapterNumber::new(1).unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found, stored);
    }

    #[tokio::test]
    async fn test_save_patch_only_writes_patched_fields() {
        let repo = InMemoryChapterRepository::new();
        let stored = repo.insert(&draft("novel-1", 1, "<p>start</p>")).await.unwrap();
        let id = stored.id().unwrap();

        // 两个客户端基于同一旧版本各改一个字段
        let title_patch =
            AutoSavePatch::new().with_title(ChapterTitle::new("Renamed").unwrap());
        let mut from_a = stored.clone();
        from_a.apply_patch(&title_patch, at(1));

        let content_patch = AutoSavePatch::new().with_content("<p>two words</p>");
        let mut from_b = stored.clone();
        from_b.apply_patch(&content_patch, at(2));

        repo.save_patch(&from_a, &title_patch).await.unwrap();
        repo.save_patch(&from_b, &content_patch).await.unwrap();

        let merged = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(merged.title().as_str(), "Renamed");
        assert_eq!(merged.content(), "<p>two words</p>");
        assert_eq!(merged.word_count(), 2);
        assert_eq!(merged.updated_at(), at(2));
    }

    #[tokio::test]
    async fn test_mark_published_missing_chapter() {
        let repo = InMemoryChapterRepository::new();
        let orphan = draft("novel-1", 1, "x").with_id(ChapterId::new());
        let err = repo.mark_published(&orphan).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_mark_published_is_conditional_and_keeps_content() {
        let repo = InMemoryChapterRepository::new();
        let stored = repo.insert(&draft("novel-1", 1, "<p>old</p>")).await.unwrap();
        let id = stored.id().unwrap();

        // 发布基于旧版本计算，期间自动保存写入了新内容
        let published = match stored.publish(&PublishOptions::immediate(true), at(3)).unwrap() {
            PublishOutcome::Published(doc) => doc,
            other => panic!("unexpected outcome: {:?}", other),
        };
        let patch = AutoSavePatch::new().with_content("<p>new edited text</p>");
        let mut edited = stored.clone();
        edited.apply_patch(&patch, at(2));
        repo.save_patch(&edited, &patch).await.unwrap();

        let written = repo.mark_published(&published).await.unwrap();
        assert_eq!(written.status(), ChapterStatus::Published);
        assert_eq!(written.content(), "<p>new edited text</p>");
        assert_eq!(written.word_count(), 3);
        assert_eq!(written.published_at(), Some(at(3)));
        assert_eq!(repo.find_by_id(id).await.unwrap().unwrap(), written);

        // 第二次发布基于同一旧草稿，不得覆盖 publishedAt / isPublic
        let late = match stored.publish(&PublishOptions::immediate(false), at(9)).unwrap() {
            PublishOutcome::Published(doc) => doc,
            other => panic!("unexpected outcome: {:?}", other),
        };
        let err = repo.mark_published(&late).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
        assert_eq!(repo.find_by_id(id).await.unwrap().unwrap(), written);
    }

    #[tokio::test]
    async fn test_list_orders_filters_and_pages() {
        let repo = InMemoryChapterRepository::new();
        for number in [2, 4, 1, 3] {
            repo.insert(&draft("novel-1", number, "text")).await.unwrap();
        }
        repo.insert(&draft("novel-2", 9, "text")).await.unwrap();

        let page = repo.list_by_novel(&query("novel-1", SortOrder::Desc)).await.unwrap();
        let numbers: Vec<u32> = page.items.iter().map(|i| i.chapter_number.get()).collect();
        assert_eq!(numbers, vec![4, 3, 2, 1]);
        assert_eq!(page.total, 4);

        let mut paged = query("novel-1", SortOrder::Asc);
        paged.offset = 2;
        paged.limit = 1;
        let page = repo.list_by_novel(&paged).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].chapter_number.get(), 3);
        assert_eq!(page.total, 4);

        let third = repo
            .find_by_number(&NovelId::new("novel-1").unwrap(), ChapterNumber::new(3).unwrap())
            .await
            .unwrap()
            .unwrap();
        let published = match third.publish(&PublishOptions::immediate(true), at(5)).unwrap() {
            PublishOutcome::Published(doc) => doc,
            other => panic!("unexpected outcome: {:?}", other),
        };
        repo.mark_published(&published).await.unwrap();

        let mut filtered = query("novel-1", SortOrder::Asc);
        filtered.status = Some(ChapterStatus::Published);
        let page = repo.list_by_novel(&filtered).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].published_at, Some(at(5)));
    }
}
