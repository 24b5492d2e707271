//! Chapter Context - 自动保存补丁
//!
//! 只允许修改白名单字段；状态、序号、所属小说和时间戳不能通过自动保存修改。

use serde_json::Value;

use super::{ChapterError, ChapterTitle};

/// 可通过自动保存修改的字段
pub const PATCHABLE_FIELDS: &[&str] = &[
    "content",
    "contentStructured",
    "title",
    "authorNote",
    "thumbnailUrl",
];

/// 明确禁止修改的字段
pub const IMMUTABLE_FIELDS: &[&str] = &[
    "id",
    "novelId",
    "chapterNumber",
    "status",
    "createdAt",
    "updatedAt",
    "publishedAt",
];

/// 调用方可附带的统计提示，总是被忽略并重新计算
const METRIC_HINT_FIELDS: &[&str] = &["wordCount", "charCount"];

/// 自动保存补丁
///
/// `Option<Option<_>>` 字段: 外层 `None` 表示不修改，`Some(None)` 表示清空。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AutoSavePatch {
    content: Option<String>,
    content_structured: Option<Option<Value>>,
    title: Option<ChapterTitle>,
    author_note: Option<Option<String>>,
    thumbnail_url: Option<Option<String>>,
}

impl AutoSavePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_content_structured(mut self, content_structured: Option<Value>) -> Self {
        self.content_structured = Some(content_structured);
        self
    }

    pub fn with_title(mut self, title: ChapterTitle) -> Self {
        self.title = Some(title);
        self
    }

    pub fn with_author_note(mut self, author_note: Option<String>) -> Self {
        self.author_note = Some(author_note);
        self
    }

    pub fn with_thumbnail_url(mut self, thumbnail_url: Option<String>) -> Self {
        self.thumbnail_url = Some(thumbnail_url);
        self
    }

    /// 从 JSON 对象解析补丁
    ///
    /// - 禁止字段 → `ImmutableField`
    /// - 白名单外字段 → `UnknownField`
    /// - `wordCount` / `charCount` 被忽略
    pub fn from_json(value: &Value) -> Result<Self, ChapterError> {
        let object = value
            .as_object()
            .ok_or_else(|| ChapterError::InvalidPatch("patch must be a JSON object".to_string()))?;

        let mut patch = Self::new();
        for (key, field) in object {
            match key.as_str() {
                "content" => {
                    patch.content = Some(required_string(key, field)?);
                }
                "contentStructured" => {
                    patch.content_structured = Some((!field.is_null()).then(|| field.clone()));
                }
                "title" => {
                    patch.title = Some(ChapterTitle::new(required_string(key, field)?)?);
                }
                "authorNote" => {
                    patch.author_note = Some(nullable_string(key, field)?);
                }
                "thumbnailUrl" => {
                    patch.thumbnail_url = Some(nullable_string(key, field)?);
                }
                other if METRIC_HINT_FIELDS.contains(&other) => {}
                other if IMMUTABLE_FIELDS.contains(&other) => {
                    return Err(ChapterError::ImmutableField(other.to_string()));
                }
                other => return Err(ChapterError::UnknownField(other.to_string())),
            }
        }

        Ok(patch)
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn content_structured(&self) -> Option<Option<&Value>> {
        self.content_structured.as_ref().map(Option::as_ref)
    }

    pub fn title(&self) -> Option<&ChapterTitle> {
        self.title.as_ref()
    }

    pub fn author_note(&self) -> Option<Option<&str>> {
        self.author_note.as_ref().map(Option::as_deref)
    }

    pub fn thumbnail_url(&self) -> Option<Option<&str>> {
        self.thumbnail_url.as_ref().map(Option::as_deref)
    }

    /// 是否修改正文（需要重新计算统计）
    pub fn touches_content(&self) -> bool {
        self.content.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_none()
            && self.content_structured.is_none()
            && self.title.is_none()
            && self.author_note.is_none()
            && self.thumbnail_url.is_none()
    }
}

fn required_string(key: &str, value: &Value) -> Result<String, ChapterError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ChapterError::InvalidPatch(format!("`{}` must be a string", key)))
}

fn nullable_string(key: &str, value: &Value) -> Result<Option<String>, ChapterError> {
    if value.is_null() {
        return Ok(None);
    }
    required_string(key, value).map(Some)
}
