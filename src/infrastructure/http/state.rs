//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;

use crate::application::{
    // Command handlers
    AutoSaveHandler, CreateDraftHandler, PublishChapterHandler,
    // Query handlers
    GetChapterHandler, ListChaptersHandler, PageLimits,
    // Ports
    ChapterRepositoryPort, ClockPort, PublishSchedulerPort,
};

/// 应用状态
///
/// 端口只在构造时注入各处理器，路由层不直接访问
pub struct AppState {
    // ========== Command Handlers ==========
    pub create_draft_handler: CreateDraftHandler,
    pub autosave_handler: AutoSaveHandler,
    pub publish_handler: PublishChapterHandler,

    // ========== Query Handlers ==========
    pub get_chapter_handler: GetChapterHandler,
    pub list_chapters_handler: ListChaptersHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
        publish_scheduler: Arc<dyn PublishSchedulerPort>,
        clock: Arc<dyn ClockPort>,
        page_limits: PageLimits,
    ) -> Self {
        Self {
            // Command handlers
            create_draft_handler: CreateDraftHandler::new(chapter_repo.clone(), clock.clone()),
            autosave_handler: AutoSaveHandler::new(chapter_repo.clone(), clock.clone()),
            publish_handler: PublishChapterHandler::new(
                chapter_repo.clone(),
                publish_scheduler,
                clock,
            ),

            // Query handlers
            get_chapter_handler: GetChapterHandler::new(chapter_repo.clone()),
            list_chapters_handler: ListChaptersHandler::new(chapter_repo, page_limits),
        }
    }
}
