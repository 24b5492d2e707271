//! In-Memory Publish Scheduler Implementation

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::application::ports::{PublishSchedulerPort, ScheduledPublish, SchedulerError};
use crate::domain::chapter::ChapterId;

/// 内存定时发布意图表
pub struct InMemoryPublishScheduler {
    intents: DashMap<ChapterId, ScheduledPublish>,
}

impl InMemoryPublishScheduler {
    pub fn new() -> Self {
        Self {
            intents: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }
}

impl Default for InMemoryPublishScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl PublishSchedulerPort for InMemoryPublishScheduler {
    fn schedule(&self, intent: ScheduledPublish) -> Result<(), SchedulerError> {
        tracing::info!(
            chapter_id = %intent.chapter_id,
            scheduled_at = %intent.scheduled_at,
            "Publish scheduled"
        );
        self.intents.insert(intent.chapter_id, intent);
        Ok(())
    }

    fn pending(&self, chapter_id: ChapterId) -> Option<ScheduledPublish> {
        self.intents.get(&chapter_id).map(|i| i.clone())
    }

    fn cancel(&self, chapter_id: ChapterId) -> bool {
        let removed = self.intents.remove(&chapter_id).is_some();
        if removed {
            tracing::debug!(chapter_id = %chapter_id, "Scheduled publish cancelled");
        }
        removed
    }

    fn due(&self, now: DateTime<Utc>) -> Vec<ScheduledPublish> {
        let mut due: Vec<ScheduledPublish> = self
            .intents
            .iter()
            .filter(|entry| entry.scheduled_at <= now)
            .map(|entry| entry.value().clone())
            .collect();
        due.sort_by_key(|intent| intent.scheduled_at);
        due
    }
}
