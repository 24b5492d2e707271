//! Infrastructure Layer - 基础设施层
//!
//! 提供所有端口的具体实现

pub mod clock;
pub mod http;
pub mod memory;
pub mod persistence;

pub use clock::{FixedClock, SystemClock};
pub use memory::{InMemoryChapterRepository, InMemoryPublishScheduler};
pub use persistence::sqlite::SqliteChapterRepository;
