use serde::{Deserialize, Serialize};

use crate::domain::services::TranscodeCopy;

/// Body of `POST /{account_id}/stream/copy`
#[derive(Debug, Serialize)]
pub struct StreamCopyRequest {
    pub url: String,
    pub meta: StreamCopyMeta,
}

#[derive(Debug, Serialize)]
pub struct StreamCopyMeta {
    pub name: String,
    pub path: String,
    #[serde(rename = "contentURI")]
    pub content_uri: String,
    #[serde(rename = "contentRef")]
    pub content_ref: String,
}

/// Response envelope returned by the transcoding API
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StreamEnvelope {
    pub success: Option<bool>,
    pub errors: Vec<StreamMessage>,
    pub result: Option<StreamVideo>,
}

#[derive(Debug, Deserialize)]
pub struct StreamMessage {
    pub code: Option<i64>,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct StreamVideo {
    pub uid: Option<String>,
}

impl From<&TranscodeCopy> for StreamCopyRequest {
    fn from(copy: &TranscodeCopy) -> Self {
        Self {
            url: copy.source_url.clone(),
            meta: StreamCopyMeta {
                name: copy.name.clone(),
                path: copy.path.clone(),
                content_uri: copy.content_uri.clone(),
                content_ref: copy.content_ref.clone(),
            },
        }
    }
}

impl StreamEnvelope {
    /// Join the reported error messages
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return "no error details".to_string();
        }

        self.errors
            .iter()
            .map(|e| match e.code {
                Some(code) => format!("{code}: {}", e.message),
                None => e.message.clone(),
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}
