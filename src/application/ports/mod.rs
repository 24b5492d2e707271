//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod clock;
mod publish_scheduler;
mod repositories;

pub use clock::ClockPort;
pub use publish_scheduler::{PublishSchedulerPort, ScheduledPublish, SchedulerError};
pub use repositories::{ChapterListQuery, ChapterPage, ChapterRepositoryPort, RepositoryError};
