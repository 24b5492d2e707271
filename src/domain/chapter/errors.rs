//! Chapter Context - Errors

use thiserror::Error;

use super::ChapterNumber;
use crate::domain::envelope::{EnvelopeError, ErrorCode};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChapterError {
    #[error("novelId cannot be empty")]
    InvalidNovelId,

    #[error("chapterNumber must be a positive integer, got {0}")]
    InvalidChapterNumber(String),

    #[error("Invalid title: {0}")]
    InvalidTitle(String),

    #[error("Field `{0}` cannot be changed by autosave")]
    ImmutableField(String),

    #[error("Field `{0}` is not an autosave field")]
    UnknownField(String),

    #[error("Invalid patch: {0}")]
    InvalidPatch(String),

    #[error("Chapter {0} is already published")]
    AlreadyPublished(ChapterNumber),
}

impl EnvelopeError for ChapterError {
    fn error_code(&self) -> ErrorCode {
        match self {
            ChapterError::AlreadyPublished(_) => ErrorCode::Conflict,
            _ => ErrorCode::ValidationError,
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        let field = match self {
            ChapterError::InvalidNovelId => "novelId",
            ChapterError::InvalidChapterNumber(_) => "chapterNumber",
            ChapterError::InvalidTitle(_) => "title",
            ChapterError::ImmutableField(field) | ChapterError::UnknownField(field) => field.as_str(),
            ChapterError::InvalidPatch(_) | ChapterError::AlreadyPublished(_) => return None,
        };
        Some(serde_json::json!({ "field": field }))
    }
}
