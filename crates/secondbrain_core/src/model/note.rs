//! Note domain model.
//!
//! # Responsibility
//! - Define the note record stored by a brain.
//! - Convert notes to and from their persisted JSON mapping.
//!
//! # Invariants
//! - `id` is assigned once at creation and never changes.
//! - `created_at` is immutable; `updated_at` is refreshed on every mutation.
//! - Tags are stored as given: no case folding, no deduplication.

use crate::model::clock::{format_note_id, format_timestamp, next_instant, now_timestamp};
use serde_json::{json, Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Identifier type for notes. Kept as an alias to make intent explicit.
pub type NoteId = String;

/// Decode failure for one persisted note record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteDecodeError {
    /// The record is not a JSON object.
    NotAnObject,
    /// A required field (`title` or `content`) is absent.
    MissingField(&'static str),
    /// A field is present but holds the wrong JSON type.
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
}

impl Display for NoteDecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAnObject => write!(f, "note record must be a JSON object"),
            Self::MissingField(field) => write!(f, "note record is missing `{field}`"),
            Self::InvalidField { field, expected } => {
                write!(f, "note field `{field}` must be {expected}")
            }
        }
    }
}

impl Error for NoteDecodeError {}

/// A single user-authored note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    /// ISO-8601 creation stamp. Ordering key for every list view.
    pub created_at: String,
    /// ISO-8601 stamp of the latest mutation.
    pub updated_at: String,
}

/// Partial update request. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl NoteUpdate {
    /// Returns whether this update carries no field at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.tags.is_none()
    }
}

impl Note {
    /// Creates a note with a generated identifier and fresh timestamps.
    ///
    /// `id` and `created_at` are rendered from the same clock instant.
    pub fn new(title: impl Into<String>, content: impl Into<String>, tags: Vec<String>) -> Self {
        let instant = next_instant();
        Self {
            id: format_note_id(&instant),
            title: title.into(),
            content: content.into(),
            tags,
            created_at: format_timestamp(&instant),
            updated_at: now_timestamp(),
        }
    }

    /// Creates a note with a caller-provided identity.
    ///
    /// Used by the load path where identity already exists on disk.
    /// `created_at` falls back to the current time when absent.
    pub fn with_id(
        id: impl Into<NoteId>,
        title: impl Into<String>,
        content: impl Into<String>,
        tags: Vec<String>,
        created_at: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            tags,
            created_at: created_at.unwrap_or_else(now_timestamp),
            updated_at: now_timestamp(),
        }
    }

    /// Overwrites the supplied fields and refreshes `updated_at`.
    pub fn apply(&mut self, update: NoteUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(content) = update.content {
            self.content = content;
        }
        if let Some(tags) = update.tags {
            self.tags = tags;
        }
        self.updated_at = now_timestamp();
    }

    /// Serializes the note into its persisted mapping.
    pub fn to_value(&self) -> Value {
        json!({
            "id": self.id,
            "title": self.title,
            "content": self.content,
            "tags": self.tags,
            "created_at": self.created_at,
            "updated_at": self.updated_at,
        })
    }

    /// Rebuilds a note from its persisted mapping.
    ///
    /// Unknown keys are ignored. `tags` defaults to empty, a missing `id` is
    /// generated and missing timestamps are stamped with the current time.
    ///
    /// # Errors
    /// - `MissingField` when `title` or `content` is absent.
    /// - `InvalidField` when a known key holds the wrong JSON type.
    pub fn from_value(value: &Value) -> Result<Self, NoteDecodeError> {
        let record = value.as_object().ok_or(NoteDecodeError::NotAnObject)?;

        let title = required_string(record, "title")?;
        let content = required_string(record, "content")?;
        let tags = optional_tags(record)?;
        let id = optional_string(record, "id")?;
        let created_at = optional_string(record, "created_at")?;
        let updated_at = optional_string(record, "updated_at")?;

        let mut note = match id {
            Some(id) => Self::with_id(id, title, content, tags, created_at),
            None => {
                let mut note = Self::new(title, content, tags);
                if let Some(created_at) = created_at {
                    note.created_at = created_at;
                }
                note
            }
        };
        if let Some(updated_at) = updated_at {
            note.updated_at = updated_at;
        }
        Ok(note)
    }

    /// Returns at most `max_chars` characters of content, with an ellipsis
    /// when truncated.
    pub fn preview(&self, max_chars: usize) -> String {
        let mut preview: String = self.content.chars().take(max_chars).collect();
        if self.content.chars().count() > max_chars {
            preview.push_str("...");
        }
        preview
    }

    /// Returns whether any tag equals `tag`, ignoring case.
    pub fn has_tag(&self, tag: &str) -> bool {
        let wanted = tag.to_lowercase();
        self.tags.iter().any(|candidate| candidate.to_lowercase() == wanted)
    }
}

impl Display for Note {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Note: {}", self.title)?;
        if !self.tags.is_empty() {
            write!(f, " [{}]", self.tags.join(", "))?;
        }
        write!(f, "\n{}", self.content)
    }
}

fn required_string(
    record: &Map<String, Value>,
    field: &'static str,
) -> Result<String, NoteDecodeError> {
    optional_string(record, field)?.ok_or(NoteDecodeError::MissingField(field))
}

fn optional_string(
    record: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, NoteDecodeError> {
    match record.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(NoteDecodeError::InvalidField {
            field,
            expected: "a string",
        }),
    }
}

fn optional_tags(record: &Map<String, Value>) -> Result<Vec<String>, NoteDecodeError> {
    let invalid = NoteDecodeError::InvalidField {
        field: "tags",
        expected: "an array of strings",
    };
    match record.get("tags") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string).ok_or_else(|| invalid.clone()))
            .collect(),
        Some(_) => Err(invalid),
    }
}
