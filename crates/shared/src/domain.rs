use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

pub const MAX_TITLE_CHARS: usize = 100;
pub const PREVIEW_CHARS: usize = 100;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

id_newtype!(StoryId);

impl StoryId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A persisted story record.
///
/// Field names and timestamp encoding match the stored JSON layout:
/// `id`, `title`, `content`, `createdAt`, `updatedAt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub id: StoryId,
    pub title: String,
    pub content: String,
    #[serde(with = "iso_millis")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "iso_millis")]
    pub updated_at: DateTime<Utc>,
}

impl Story {
    pub fn new(draft: StoryDraft, now: DateTime<Utc>) -> Self {
        let now = iso_millis::truncate(now);
        Self {
            id: StoryId::generate(),
            title: draft.title,
            content: draft.content,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces title and content and restamps `updated_at`, never earlier
    /// than `created_at`.
    pub fn apply(&mut self, draft: StoryDraft, now: DateTime<Utc>) {
        self.title = draft.title;
        self.content = draft.content;
        self.updated_at = iso_millis::truncate(now).max(self.created_at);
    }

    pub fn word_count(&self) -> usize {
        word_count(&self.content)
    }

    pub fn preview(&self) -> String {
        preview(&self.content)
    }
}

/// Title and content that passed write-boundary validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryDraft {
    title: String,
    content: String,
}

impl StoryDraft {
    pub fn new(title: &str, content: &str) -> Result<Self, ValidationError> {
        let title = title.trim();
        let content = content.trim();

        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if content.is_empty() {
            return Err(ValidationError::EmptyContent);
        }

        // soft cap: longer titles are cut, never rejected
        let title = truncate_chars(title, MAX_TITLE_CHARS).trim_end();

        Ok(Self {
            title: title.to_string(),
            content: content.to_string(),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// First [`PREVIEW_CHARS`] characters of `text`, with `...` appended when
/// anything was cut.
pub fn preview(text: &str) -> String {
    let head = truncate_chars(text, PREVIEW_CHARS);
    if head.len() < text.len() {
        format!("{head}...")
    } else {
        text.to_string()
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => &text[..cut],
        None => text,
    }
}

/// ISO-8601 with millisecond precision and a `Z` suffix, e.g.
/// `2024-03-01T09:30:00.000Z`.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn truncate(value: DateTime<Utc>) -> DateTime<Utc> {
        value.trunc_subsecs(3)
    }

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|parsed| parsed.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
