//! Chapter Context - Value Objects

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ChapterError;

/// 标题最大字符数
pub const MAX_TITLE_CHARS: usize = 200;

/// 章节唯一标识（首次持久化时分配）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChapterId(Uuid);

impl ChapterId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ChapterId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ChapterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 所属小说标识（外键，不可变）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NovelId(String);

impl NovelId {
    pub fn new(id: impl Into<String>) -> Result<Self, ChapterError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ChapterError::InvalidNovelId);
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for NovelId {
    type Error = ChapterError;

    fn try_from(id: String) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl From<NovelId> for String {
    fn from(id: NovelId) -> Self {
        id.0
    }
}

impl std::fmt::Display for NovelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 章节序号（正整数，在同一小说内唯一）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct ChapterNumber(u32);

impl ChapterNumber {
    pub fn new(number: i64) -> Result<Self, ChapterError> {
        if number <= 0 || number > u32::MAX as i64 {
            return Err(ChapterError::InvalidChapterNumber(number.to_string()));
        }
        Ok(Self(number as u32))
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl TryFrom<i64> for ChapterNumber {
    type Error = ChapterError;

    fn try_from(number: i64) -> Result<Self, Self::Error> {
        Self::new(number)
    }
}

impl From<ChapterNumber> for u32 {
    fn from(number: ChapterNumber) -> Self {
        number.0
    }
}

impl std::fmt::Display for ChapterNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 章节标题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChapterTitle(String);

impl ChapterTitle {
    pub fn new(title: impl Into<String>) -> Result<Self, ChapterError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ChapterError::InvalidTitle("title cannot be empty".to_string()));
        }
        if title.chars().count() > MAX_TITLE_CHARS {
            return Err(ChapterError::InvalidTitle(format!(
                "title cannot exceed {} characters",
                MAX_TITLE_CHARS
            )));
        }
        Ok(Self(title))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ChapterTitle {
    type Error = ChapterError;

    fn try_from(title: String) -> Result<Self, Self::Error> {
        Self::new(title)
    }
}

impl From<ChapterTitle> for String {
    fn from(title: ChapterTitle) -> Self {
        title.0
    }
}

impl std::fmt::Display for ChapterTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 章节状态
///
/// Draft → Published，发布后不可回退
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChapterStatus {
    Draft,
    Published,
}

impl ChapterStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChapterStatus::Draft => "draft",
            ChapterStatus::Published => "published",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(ChapterStatus::Draft),
            "published" => Some(ChapterStatus::Published),
            _ => None,
        }
    }
}

impl Default for ChapterStatus {
    fn default() -> Self {
        ChapterStatus::Draft
    }
}

impl std::fmt::Display for ChapterStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chapter_number_must_be_positive() {
        assert!(ChapterNumber::new(0).is_err());
        assert!(ChapterNumber::new(-3).is_err());
        assert!(ChapterNumber::new(u32::MAX as i64 + 1).is_err());
        assert_eq!(ChapterNumber::new(12).unwrap().get(), 12);
    }

    #[test]
    fn test_title_validation() {
        assert!(ChapterTitle::new("").is_err());
        assert!(ChapterTitle::new("   ").is_err());
        assert!(ChapterTitle::new("章".repeat(MAX_TITLE_CHARS)).is_ok());
        assert!(ChapterTitle::new("章".repeat(MAX_TITLE_CHARS + 1)).is_err());
    }

    #[test]
    fn test_novel_id_rejects_blank() {
        assert!(NovelId::new("").is_err());
        assert_eq!(NovelId::new("novel-1").unwrap().as_str(), "novel-1");
    }

    #[test]
    fn test_value_objects_validate_on_deserialize() {
        assert!(serde_json::from_str::<ChapterNumber>("0").is_err());
        assert!(serde_json::from_str::<ChapterTitle>("\"\"").is_err());
        assert_eq!(serde_json::from_str::<ChapterStatus>("\"published\"").unwrap(), ChapterStatus::Published);
    }
}
