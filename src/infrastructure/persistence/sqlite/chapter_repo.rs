//! SQLite Chapter Repository

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::{FromRow, QueryBuilder, Sqlite};
use uuid::Uuid;

use super::DbPool;
use crate::application::ports::{
    ChapterListQuery, ChapterPage, ChapterRepositoryPort, RepositoryError,
};
use crate::domain::chapter::{
    AutoSavePatch, ChapterDocument, ChapterId, ChapterListItem, ChapterNumber, ChapterSnapshot,
    ChapterStatus, ChapterTitle, NovelId, SortOrder,
};

const CHAPTER_COLUMNS: &str = "id, novel_id, chapter_number, title, content, content_structured, \
     word_count, char_count, status, is_public, created_at, updated_at, published_at, \
     author_note, thumbnail_url";

const LIST_COLUMNS: &str = "id, chapter_number, title, word_count, status, published_at, updated_at";

/// SQLite Chapter Repository
pub struct SqliteChapterRepository {
    pool: DbPool,
}

impl SqliteChapterRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct ChapterRow {
    id: String,
    novel_id: String,
    chapter_number: i64,
    title: String,
    content: String,
    content_structured: Option<String>,
    word_count: i64,
    char_count: i64,
    status: String,
    is_public: bool,
    created_at: String,
    updated_at: String,
    published_at: Option<String>,
    author_note: Option<String>,
    thumbnail_url: Option<String>,
}

impl TryFrom<ChapterRow> for ChapterDocument {
    type Error = RepositoryError;

    fn try_from(row: ChapterRow) -> Result<Self, Self::Error> {
        let content_structured = row
            .content_structured
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;

        let snapshot = ChapterSnapshot {
            id: Some(parse_id(&row.id)?),
            novel_id: NovelId::new(row.novel_id).map_err(corrupt)?,
            chapter_number: ChapterNumber::new(row.chapter_number).map_err(corrupt)?,
            title: ChapterTitle::new(row.title).map_err(corrupt)?,
            content: row.content,
            content_structured,
            word_count: u32::try_from(row.word_count).ok(),
            char_count: u32::try_from(row.char_count).ok(),
            status: parse_status(&row.status)?,
            is_public: row.is_public,
            created_at: parse_time(&row.created_at)?,
            updated_at: parse_time(&row.updated_at)?,
            published_at: row.published_at.as_deref().map(parse_time).transpose()?,
            author_note: row.author_note,
            thumbnail_url: row.thumbnail_url,
        };

        Ok(snapshot.into())
    }
}

#[derive(FromRow)]
struct ChapterListRow {
    id: String,
    chapter_number: i64,
    title: String,
    word_count: i64,
    status: String,
    published_at: Option<String>,
    updated_at: String,
}

impl TryFrom<ChapterListRow> for ChapterListItem {
    type Error = RepositoryError;

    fn try_from(row: ChapterListRow) -> Result<Self, Self::Error> {
        Ok(ChapterListItem {
            id: Some(parse_id(&row.id)?),
            chapter_number: ChapterNumber::new(row.chapter_number).map_err(corrupt)?,
            title: ChapterTitle::new(row.title).map_err(corrupt)?,
            word_count: u32::try_from(row.word_count).unwrap_or_default(),
            status: parse_status(&row.status)?,
            published_at: row.published_at.as_deref().map(parse_time).transpose()?,
            updated_at: parse_time(&row.updated_at)?,
        })
    }
}

/// 固定精度的 UTC 时间，保证字符串顺序与时间顺序一致
fn format_time(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_time(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| RepositoryError::SerializationError(e.to_string()))
}

fn parse_id(s: &str) -> Result<ChapterId, RepositoryError> {
    Uuid::parse_str(s)
        .map(ChapterId::from_uuid)
        .map_err(|e| RepositoryError::SerializationError(e.to_string()))
}

fn parse_status(s: &str) -> Result<ChapterStatus, RepositoryError> {
    ChapterStatus::parse(s)
        .ok_or_else(|| RepositoryError::SerializationError(format!("unknown status: {}", s)))
}

fn corrupt(e: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::SerializationError(e.to_string())
}

fn db_error(e: sqlx::Error) -> RepositoryError {
    let unique = e
        .as_database_error()
        .map(|d| d.is_unique_violation())
        .unwrap_or(false);
    if unique {
        RepositoryError::Duplicate(e.to_string())
    } else {
        RepositoryError::DatabaseError(e.to_string())
    }
}

fn structured_json(chapter: &ChapterDocument) -> Result<Option<String>, RepositoryError> {
    chapter
        .content_structured()
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| RepositoryError::SerializationError(e.to_string()))
}

fn require_id(chapter: &ChapterDocument) -> Result<ChapterId, RepositoryError> {
    chapter
        .id()
        .ok_or_else(|| RepositoryError::NotFound("chapter without id".to_string()))
}

fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, query: &ChapterListQuery) {
    qb.push(" WHERE novel_id = ");
    qb.push_bind(query.novel_id.as_str().to_string());
    if let Some(status) = query.status {
        qb.push(" AND status = ");
        qb.push_bind(status.as_str());
    }
}

#[async_trait]
impl ChapterRepositoryPort for SqliteChapterRepository {
    async fn insert(&self, chapter: &ChapterDocument) -> Result<ChapterDocument, RepositoryError> {
        let id = chapter.id().unwrap_or_default();
        let stored = chapter.clone().with_id(id);

        sqlx::query(&format!(
            "INSERT INTO chapters ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            CHAPTER_COLUMNS
        ))
        .bind(id.to_string())
        .bind(stored.novel_id().as_str())
        .bind(stored.chapter_number().get() as i64)
        .bind(stored.title().as_str())
        .bind(stored.content())
        .bind(structured_json(&stored)?)
        .bind(stored.word_count() as i64)
        .bind(stored.char_count() as i64)
        .bind(stored.status().as_str())
        .bind(stored.is_public())
        .bind(format_time(stored.created_at()))
        .bind(format_time(stored.updated_at()))
        .bind(stored.published_at().map(format_time))
        .bind(stored.author_note())
        .bind(stored.thumbnail_url())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(stored)
    }

    async fn find_by_id(&self, id: ChapterId) -> Result<Option<ChapterDocument>, RepositoryError> {
        let row: Option<ChapterRow> = sqlx::query_as(&format!(
            "SELECT {} FROM chapters WHERE id = ?",
            CHAPTER_COLUMNS
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(ChapterDocument::try_from).transpose()
    }

    async fn find_by_number(
        &self,
        novel_id: &NovelId,
        chapter_number: ChapterNumber,
    ) -> Result<Option<ChapterDocument>, RepositoryError> {
        let row: Option<ChapterRow> = sqlx::query_as(&format!(
            "SELECT {} FROM chapters WHERE novel_id = ? AND chapter_number = ?",
            CHAPTER_COLUMNS
        ))
        .bind(novel_id.as_str())
        .bind(chapter_number.get() as i64)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(ChapterDocument::try_from).transpose()
    }

    async fn mark_published(
        &self,
        chapter: &ChapterDocument,
    ) -> Result<ChapterDocument, RepositoryError> {
        let id = require_id(chapter)?;
        let published_at = chapter.published_at().unwrap_or_else(|| chapter.updated_at());

        // 状态条件与写入在同一语句内完成
        let row: Option<ChapterRow> = sqlx::query_as(&format!(
            r#"
            UPDATE chapters SET
                status = ?,
                is_public = ?,
                published_at = ?,
                updated_at = ?
            WHERE id = ? AND status = ?
            RETURNING {}
            "#,
            CHAPTER_COLUMNS
        ))
        .bind(ChapterStatus::Published.as_str())
        .bind(chapter.is_public())
        .bind(format_time(published_at))
        .bind(format_time(published_at))
        .bind(id.to_string())
        .bind(ChapterStatus::Draft.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        match row {
            Some(row) => ChapterDocument::try_from(row),
            None => match self.find_by_id(id).await? {
                Some(current) => Err(RepositoryError::Conflict(format!(
                    "chapter {} is already {}",
                    id,
                    current.status().as_str()
                ))),
                None => Err(RepositoryError::NotFound(id.to_string())),
            },
        }
    }

    async fn save_patch(
        &self,
        chapter: &ChapterDocument,
        patch: &AutoSavePatch,
    ) -> Result<(), RepositoryError> {
        let id = require_id(chapter)?;

        let mut qb = QueryBuilder::<Sqlite>::new("UPDATE chapters SET updated_at = ");
        qb.push_bind(format_time(chapter.updated_at()));

        if let Some(content) = patch.content() {
            qb.push(", content = ");
            qb.push_bind(content.to_string());
            // 统计字段只由正文决定
            qb.push(", word_count = ");
            qb.push_bind(chapter.word_count() as i64);
            qb.push(", char_count = ");
            qb.push_bind(chapter.char_count() as i64);
        }
        if let Some(content_structured) = patch.content_structured() {
            let json = content_structured
                .map(serde_json::to_string)
                .transpose()
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;
            qb.push(", content_structured = ");
            qb.push_bind(json);
        }
        if let Some(title) = patch.title() {
            qb.push(", title = ");
            qb.push_bind(title.as_str().to_string());
        }
        if let Some(author_note) = patch.author_note() {
            qb.push(", author_note = ");
            qb.push_bind(author_note.map(str::to_string));
        }
        if let Some(thumbnail_url) = patch.thumbnail_url() {
            qb.push(", thumbnail_url = ");
            qb.push_bind(thumbnail_url.map(str::to_string));
        }

        qb.push(" WHERE id = ");
        qb.push_bind(id.to_string());

        let result = qb.build().execute(&self.pool).await.map_err(db_error)?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn list_by_novel(&self, query: &ChapterListQuery) -> Result<ChapterPage, RepositoryError> {
        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM chapters");
        push_filters(&mut count, query);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;

        let mut select = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM chapters", LIST_COLUMNS));
        push_filters(&mut select, query);
        select.push(match query.order {
            SortOrder::Asc => " ORDER BY chapter_number ASC",
            SortOrder::Desc => " ORDER BY chapter_number DESC",
        });
        select.push(", updated_at ASC, id ASC LIMIT ");
        select.push_bind(query.limit as i64);
        select.push(" OFFSET ");
        select.push_bind(query.offset as i64);

        let rows: Vec<ChapterListRow> = select
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        let items = rows
            .into_iter()
            .map(ChapterListItem::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ChapterPage {
            items,
            total: total.max(0) as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::ClockPort;
    use crate::domain::chapter::{PublishOptions, PublishOutcome};
    use crate::infrastructure::clock::SystemClock;
    use crate::infrastructure::persistence::sqlite::{create_pool, run_migrations, DatabaseConfig};
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    async fn repo() -> SqliteChapterRepository {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteChapterRepository::new(pool)
    }

    fn at(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 2, 10, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    fn draft(number: i64, content: &str) -> ChapterDocument {
        ChapterDocument::new_draft(
            NovelId::new("novel-1").unwrap(),
            ChapterNumber::new(number).unwrap(),
            ChapterTitle::new(format!("Chapter {}", number)).unwrap(),
            content,
            at(0),
        )
    }

    #[tokio::test]
    async fn test_insert_and_find_round_trip() {
        let repo = repo().await;
        let chapter = draft(1, "<p>Hello <b>world</b></p>")
            .with_content_structured(Some(json!({"type": "doc"})))
            .with_author_note(Some("note".to_string()));

        let stored = repo.insert(&chapter).await.unwrap();
        let id = stored.id().unwrap();

        let found = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(found, stored);
        assert_eq!(found.word_count(), 2);
        assert_eq!(found.content_structured(), Some(&json!({"type": "doc"})));

        let by_number = repo
            .find_by_number(&NovelId::new("novel-1").unwrap(), ChapterNumber::new(1).unwrap())
            .await
            .unwrap();
        assert_eq!(by_number, Some(stored));

        assert!(repo.find_by_id(ChapterId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_number_is_rejected() {
        let repo = repo().await;
        repo.insert(&draft(1, "a")).await.unwrap();
        let err = repo.insert(&draft(1, "b")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_save_patch_merges_fields() {
        let repo = repo().await;
        let stored = repo.insert(&draft(1, "<p>start</p>")).await.unwrap();
        let id = stored.id().unwrap();

        let note_patch = AutoSavePatch::new().with_author_note(Some("thanks".to_string()));
        let mut from_a = stored.clone();
        from_a.apply_patch(&note_patch, at(1));

        let content_patch = AutoSavePatch::new().with_content("one two three");
        let mut from_b = stored.clone();
        from_b.apply_patch(&content_patch, at(2));

        repo.save_patch(&from_a, &note_patch).await.unwrap();
        repo.save_patch(&from_b, &content_patch).await.unwrap();

        let merged = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(merged.author_note(), Some("thanks"));
        assert_eq!(merged.content(), "one two three");
        assert_eq!(merged.word_count(), 3);
        assert_eq!(merged.updated_at(), at(2));
        assert_eq!(merged.status(), ChapterStatus::Draft);
    }

    #[tokio::test]
    async fn test_mark_published_and_filter() {
        let repo = repo().await;
        for number in [3, 1, 2] {
            repo.insert(&draft(number, "text")).await.unwrap();
        }
        let second = repo
            .find_by_number(&NovelId::new("novel-1").unwrap(), ChapterNumber::new(2).unwrap())
            .await
            .unwrap()
            .unwrap();
        let published = match second.publish(&PublishOptions::immediate(true), at(3)).unwrap() {
            PublishOutcome::Published(doc) => doc,
            other => panic!("unexpected outcome: {:?}", other),
        };
        repo.mark_published(&published).await.unwrap();

        let query = ChapterListQuery {
            novel_id: NovelId::new("novel-1").unwrap(),
            status: None,
            order: SortOrder::Desc,
            offset: 0,
            limit: 10,
        };
        let page = repo.list_by_novel(&query).await.unwrap();
        let numbers: Vec<u32> = page.items.iter().map(|i| i.chapter_number.get()).collect();
        assert_eq!(numbers, vec![3, 2, 1]);
        assert_eq!(page.total, 3);

        let filtered = repo
            .list_by_novel(&ChapterListQuery {
                status: Some(ChapterStatus::Published),
                ..query.clone()
            })
            .await
            .unwrap();
        assert_eq!(filtered.total, 1);
        assert_eq!(filtered.items[0].published_at, Some(at(3)));

        let paged = repo
            .list_by_novel(&ChapterListQuery {
                order: SortOrder::Asc,
                offset: 1,
                limit: 1,
                ..query
            })
            .await
            .unwrap();
        assert_eq!(paged.items.len(), 1);
        assert_eq!(paged.items[0].chapter_number.get(), 2);
        assert_eq!(paged.total, 3);
    }

    #[tokio::test]
    async fn test_mark_published_unknown_chapter() {
        let repo = repo().await;
        let orphan = draft(1, "x").with_id(ChapterId::new());
        let err = repo.mark_published(&orphan).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_mark_published_only_once_and_keeps_autosave() {
        let repo = repo().await;
        let stored = repo.insert(&draft(1, "<p>old</p>")).await.unwrap();
        let id = stored.id().unwrap();

        let publish = |is_public: bool, minutes: i64| {
            match stored
                .publish(&PublishOptions::immediate(is_public), at(minutes))
                .unwrap()
            {
                PublishOutcome::Published(doc) => doc,
                other => panic!("unexpected outcome: {:?}", other),
            }
        };

        // 两次发布都基于同一旧草稿；中间插入一次自动保存
        let first = publish(true, 3);
        let late = publish(false, 9);

        let patch = AutoSavePatch::new().with_content("<p>new edited text</p>");
        let mut edited = stored.clone();
        edited.apply_patch(&patch, at(2));
        repo.save_patch(&edited, &patch).await.unwrap();

        let written = repo.mark_published(&first).await.unwrap();
        assert_eq!(written.status(), ChapterStatus::Published);
        assert_eq!(written.content(), "<p>new edited text</p>");
        assert_eq!(written.word_count(), 3);
        assert_eq!(written.published_at(), Some(at(3)));
        assert!(written.is_public());

        let err = repo.mark_published(&late).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));

        let current = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(current, written);
    }

    #[tokio::test]
    async fn test_system_clock_times_survive_storage() {
        let repo = repo().await;
        let chapter = ChapterDocument::new_draft(
            NovelId::new("novel-1").unwrap(),
            ChapterNumber::new(1).unwrap(),
            ChapterTitle::new("Now").unwrap(),
            "text",
            SystemClock.now(),
        );

        let stored = repo.insert(&chapter).await.unwrap();
        let published = match stored
            .publish(&PublishOptions::immediate(true), SystemClock.now())
            .unwrap()
        {
            PublishOutcome::Published(doc) => doc,
            other => panic!("unexpected outcome: {:?}", other),
        };
        let written = repo.mark_published(&published).await.unwrap();
        assert_eq!(written.published_at(), published.published_at());

        let found = repo.find_by_id(stored.id().unwrap()).await.unwrap().unwrap();
        assert_eq!(found.created_at(), stored.created_at());
        assert_eq!(found, written);
    }
}
