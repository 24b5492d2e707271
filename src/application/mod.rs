//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（ChapterRepository、Clock、PublishScheduler）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    handlers::{
        AutoSaveHandler, AutoSaveReceipt, CreateDraftHandler, PublishChapterHandler,
        PublishedChapter,
    },
    AutoSaveChapter, CreateDraft, PublishChapter,
};

pub use error::ApplicationError;

pub use ports::{
    ChapterListQuery, ChapterPage, ChapterRepositoryPort, ClockPort, PublishSchedulerPort,
    RepositoryError, ScheduledPublish, SchedulerError,
};

pub use queries::{
    handlers::{
        ChapterListResponse, GetChapterHandler, ListChaptersHandler, PageLimits,
        DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
    },
    GetChapter, ListChapters,
};
