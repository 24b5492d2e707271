//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Envelope Context: 统一结果信封
//! - Chapter Context: 章节内容生命周期

pub mod chapter;
pub mod envelope;

// 共享的内容统计
mod content_metrics;

pub use content_metrics::{measure, strip_markup, ContentMetrics};
