use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::entities::UploadEvent;

/// Storage object payload delivered by the "object finalized" trigger
///
/// The storage platform encodes 64-bit integers such as `size` and
/// `generation` as JSON strings; plain numbers are accepted as well. A field
/// of an unexpected type decodes as absent so the event is skipped rather
/// than rejected.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageObjectData {
    #[serde(default, deserialize_with = "text_or_none")]
    pub bucket: Option<String>,
    #[serde(default, deserialize_with = "text_or_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "text_or_none")]
    pub content_type: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub size: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub generation: Option<String>,
}

fn text_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        _ => None,
    })
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        Value::Number(number) => number.as_u64().map(|n| n.to_string()),
        _ => None,
    })
}

impl StorageObjectData {
    /// Convert to a domain event; the configured bucket fills in a missing one
    pub fn into_event(self, default_bucket: &str) -> UploadEvent {
        let bucket = self
            .bucket
            .filter(|bucket| !bucket.is_empty())
            .unwrap_or_else(|| default_bucket.to_string());

        UploadEvent {
            bucket,
            path: self.name,
            content_type: self.content_type,
            size: self.size.and_then(|s| s.trim().parse().ok()),
            generation: self.generation,
        }
    }
}

/// What a moderation handler did with one event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ModerationOutcome {
    /// The event was not for this pipeline; nothing was touched
    Skipped { reason: String },
    /// Content passed moderation and needs no further work
    Approved { path: String },
    /// Content was flagged and now holds the placeholder bytes
    Replaced { path: String, placeholder: String },
    /// Content passed moderation and was handed to the transcoding service
    Forwarded { path: String, transcode_uid: Option<String> },
}

impl ModerationOutcome {
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped { reason: reason.into() }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Skipped { .. } => "skipped",
            Self::Approved { .. } => "approved",
            Self::Replaced { .. } => "replaced",
            Self::Forwarded { .. } => "forwarded",
        }
    }
}
