//! Memory Layer - In-Memory State Management
//!
//! 章节仓储与定时发布意图的内存实现，用于测试和单机部署

mod chapter_repo;
mod publish_scheduler;

pub use chapter_repo::InMemoryChapterRepository;
pub use publish_scheduler::InMemoryPublishScheduler;
