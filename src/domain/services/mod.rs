use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{ExplicitContentAnnotation, ObjectRef, SafeSearchAnnotation};

/// Errors reported by the remote content-safety classifiers
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("Classifier request failed: {0}")]
    Request(String),

    #[error("Classifier returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Classifier rejected {uri}: {message}")]
    Rejected { uri: String, message: String },

    #[error("Malformed classifier response: {0}")]
    MalformedResponse(String),
}

/// Errors reported by the remote transcoding service
#[derive(Debug, thiserror::Error)]
pub enum TranscodeError {
    #[error("Transcode request failed: {0}")]
    Request(String),

    #[error("Transcoding service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Transcoding service refused the copy: {0}")]
    Refused(String),
}

/// Image safe-search classification
#[async_trait]
pub trait SafeSearchDetector: Send + Sync {
    /// Classify the referenced image
    async fn detect_safe_search(
        &self,
        object: &ObjectRef,
    ) -> Result<SafeSearchAnnotation, ClassifierError>;
}

/// Video explicit-content classification
///
/// Implementations may run a long-running remote job; the call only returns
/// once the job has completed.
#[async_trait]
pub trait ExplicitContentDetector: Send + Sync {
    async fn detect_explicit_content(
        &self,
        object: &ObjectRef,
    ) -> Result<ExplicitContentAnnotation, ClassifierError>;
}

/// A "copy from URL" request for the transcoding service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscodeCopy {
    /// Time-limited URL the service downloads the source from
    pub source_url: String,
    /// Display name shown by the transcoding service
    pub name: String,
    /// Object path inside the bucket
    pub path: String,
    /// Storage URI of the source object
    pub content_uri: String,
    /// Bucket-qualified identifier of the source object
    pub content_ref: String,
}

/// Acknowledgement returned by the transcoding service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscodeReceipt {
    pub uid: Option<String>,
}

/// Submission of video sources to a remote transcoding service
#[async_trait]
pub trait TranscodeSubmitter: Send + Sync {
    async fn submit_copy(
        &self,
        request: &TranscodeCopy,
    ) -> Result<TranscodeReceipt, TranscodeError>;
}
