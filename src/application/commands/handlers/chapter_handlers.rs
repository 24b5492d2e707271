//! Chapter Command Handlers
//!
//! 每个处理器都返回 `ResultEnvelope`，业务失败不会以 `Err` 形式抛出

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::application::commands::{AutoSaveChapter, CreateDraft, PublishChapter};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    ChapterRepositoryPort, ClockPort, PublishSchedulerPort, ScheduledPublish,
};
use crate::domain::chapter::{
    AutoSavePatch, ChapterDocument, ChapterId, ChapterNumber, ChapterTitle, NovelId,
    PublishOutcome,
};
use crate::domain::envelope::ResultEnvelope;

// ============================================================================
// Response DTOs
// ============================================================================

/// 自动保存回执
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoSaveReceipt {
    pub saved_at: DateTime<Utc>,
}

/// 发布响应：章节文档，定时发布时附带计划时间
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedChapter {
    #[serde(flatten)]
    pub chapter: ChapterDocument,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<DateTime<Utc>>,
}

// ============================================================================
// CreateDraft
// ============================================================================

/// CreateDraft Handler
pub struct CreateDraftHandler {
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
    clock: Arc<dyn ClockPort>,
}

impl CreateDraftHandler {
    pub fn new(chapter_repo: Arc<dyn ChapterRepositoryPort>, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            chapter_repo,
            clock,
        }
    }

    pub async fn handle(&self, command: CreateDraft) -> ResultEnvelope<ChapterDocument> {
        ResultEnvelope::from_result(self.try_handle(command).await, "Draft created")
    }

    async fn try_handle(&self, command: CreateDraft) -> Result<ChapterDocument, ApplicationError> {
        let novel_id = NovelId::new(command.novel_id)?;
        let chapter_number = ChapterNumber::new(command.chapter_number)?;
        let title = ChapterTitle::new(command.title)?;

        if self
            .chapter_repo
            .find_by_number(&novel_id, chapter_number)
            .await?
            .is_some()
        {
            return Err(ApplicationError::conflict(format!(
                "Chapter {} already exists in novel {}",
                chapter_number, novel_id
            )));
        }

        let draft = ChapterDocument::new_draft(
            novel_id,
            chapter_number,
            title,
            command.content,
            self.clock.now(),
        )
        .with_content_structured(command.content_structured)
        .with_author_note(command.author_note)
        .with_thumbnail_url(command.thumbnail_url);

        let chapter = self.chapter_repo.insert(&draft).await?;

        tracing::info!(
            chapter_id = ?chapter.id(),
            novel_id = %chapter.novel_id(),
            chapter_number = %chapter.chapter_number(),
            word_count = chapter.word_count(),
            "Draft created"
        );

        Ok(chapter)
    }
}

// ============================================================================
// AutoSave
// ============================================================================

/// AutoSave Handler
pub struct AutoSaveHandler {
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
    clock: Arc<dyn ClockPort>,
}

impl AutoSaveHandler {
    pub fn new(chapter_repo: Arc<dyn ChapterRepositoryPort>, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            chapter_repo,
            clock,
        }
    }

    pub async fn handle(&self, command: AutoSaveChapter) -> ResultEnvelope<AutoSaveReceipt> {
        ResultEnvelope::from_result(self.try_handle(command).await, "Saved")
    }

    /// 从原始 JSON 补丁自动保存
    ///
    /// 禁止字段与白名单外字段返回 VALIDATION_ERROR 信封
    pub async fn handle_json(
        &self,
        chapter_id: ChapterId,
        patch: &Value,
    ) -> ResultEnvelope<AutoSaveReceipt> {
        match AutoSavePatch::from_json(patch) {
            Ok(patch) => self.handle(AutoSaveChapter { chapter_id, patch }).await,
            Err(e) => {
                tracing::debug!(chapter_id = %chapter_id, error = %e, "Autosave patch rejected");
                ResultEnvelope::from_result(Err(ApplicationError::from(e)), "")
            }
        }
    }

    async fn try_handle(&self, command: AutoSaveChapter) -> Result<AutoSaveReceipt, ApplicationError> {
        let chapter_id = command.chapter_id;

        let mut chapter = self
            .chapter_repo
            .find_by_id(chapter_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Chapter", chapter_id))?;

        let now = self.clock.now();
        chapter.apply_patch(&command.patch, now);

        self.chapter_repo.save_patch(&chapter, &command.patch).await?;

        tracing::debug!(
            chapter_id = %chapter_id,
            word_count = chapter.word_count(),
            char_count = chapter.char_count(),
            "Chapter autosaved"
        );

        Ok(AutoSaveReceipt { saved_at: now })
    }
}

// ============================================================================
// Publish
// ============================================================================

/// PublishChapter Handler
pub struct PublishChapterHandler {
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
    scheduler: Arc<dyn PublishSchedulerPort>,
    clock: Arc<dyn ClockPort>,
}

impl PublishChapterHandler {
    pub fn new(
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
        scheduler: Arc<dyn PublishSchedulerPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            chapter_repo,
            scheduler,
            clock,
        }
    }

    pub async fn handle(&self, command: PublishChapter) -> ResultEnvelope<PublishedChapter> {
        match self.try_handle(command).await {
            Ok(published) => {
                let message = match published.scheduled_at {
                    Some(at) => format!("Chapter scheduled for publication at {}", at.to_rfc3339()),
                    None => "Chapter published".to_string(),
                };
                ResultEnvelope::success(published, message)
            }
            Err(e) => ResultEnvelope::from_result(Err(e), ""),
        }
    }

    async fn try_handle(&self, command: PublishChapter) -> Result<PublishedChapter, ApplicationError> {
        let chapter_id = command.chapter_id;

        let chapter = self
            .chapter_repo
            .find_by_id(chapter_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Chapter", chapter_id))?;

        let now = self.clock.now();
        match chapter.publish(&command.options, now)? {
            PublishOutcome::Published(published) => {
                // 条件写入：读取后被并发发布时返回 CONFLICT
                let published = self.chapter_repo.mark_published(&published).await?;
                if self.scheduler.cancel(chapter_id) {
                    tracing::debug!(chapter_id = %chapter_id, "Pending schedule superseded");
                }

                tracing::info!(
                    chapter_id = %chapter_id,
                    novel_id = %published.novel_id(),
                    chapter_number = %published.chapter_number(),
                    is_public = published.is_public(),
                    "Chapter published"
                );

                Ok(PublishedChapter {
                    chapter: published,
                    scheduled_at: None,
                })
            }
            PublishOutcome::Scheduled {
                chapter,
                scheduled_at,
                is_public,
            } => {
                self.scheduler.schedule(ScheduledPublish {
                    chapter_id,
                    novel_id: chapter.novel_id().clone(),
                    chapter_number: chapter.chapter_number(),
                    scheduled_at,
                    is_public,
                    requested_at: now,
                })?;

                tracing::info!(
                    chapter_id = %chapter_id,
                    scheduled_at = %scheduled_at,
                    "Chapter publication scheduled"
                );

                Ok(PublishedChapter {
                    chapter,
                    scheduled_at: Some(scheduled_at),
                })
            }
        }
    }
}
