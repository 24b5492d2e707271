//! Publish Scheduler Port - 定时发布意图
//!
//! 引擎只校验并记录发布意图，到期后由外部调度方执行发布。

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::domain::chapter::{ChapterId, ChapterNumber, NovelId};

/// Scheduler 错误
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("Scheduler unavailable: {0}")]
    Unavailable(String),
}

/// 定时发布意图
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledPublish {
    pub chapter_id: ChapterId,
    pub novel_id: NovelId,
    pub chapter_number: ChapterNumber,
    pub scheduled_at: DateTime<Utc>,
    pub is_public: bool,
    pub requested_at: DateTime<Utc>,
}

/// Publish Scheduler Port
///
/// 同一章节只保留最新的意图
pub trait PublishSchedulerPort: Send + Sync {
    /// 记录（或替换）发布意图
    fn schedule(&self, intent: ScheduledPublish) -> Result<(), SchedulerError>;

    /// 查询章节的待执行意图
    fn pending(&self, chapter_id: ChapterId) -> Option<ScheduledPublish>;

    /// 取消意图，返回是否存在
    fn cancel(&self, chapter_id: ChapterId) -> bool;

    /// 到期的意图（scheduled_at <= now），按时间升序
    fn due(&self, now: DateTime<Utc>) -> Vec<ScheduledPublish>;
}
