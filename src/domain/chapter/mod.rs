//! Chapter Context - 章节限界上下文
//!
//! 职责:
//! - 章节文档聚合（草稿 / 发布状态机）
//! - 自动保存补丁白名单
//! - 列表投影与排序

mod aggregate;
mod errors;
mod patch;
mod value_objects;

pub use aggregate::{
    ChapterDocument, ChapterListItem, ChapterSnapshot, PublishOptions, PublishOutcome, SortOrder,
};
pub use errors::ChapterError;
pub use patch::{AutoSavePatch, IMMUTABLE_FIELDS, PATCHABLE_FIELDS};
pub use value_objects::{
    ChapterId, ChapterNumber, ChapterStatus, ChapterTitle, NovelId, MAX_TITLE_CHARS,
};
