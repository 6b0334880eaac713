use serde::{Deserialize, Serialize};
use std::fmt;

/// A finalized object reported by the storage trigger
///
/// Every field except the bucket may be missing; the pipelines treat an event
/// without a path or with a foreign content type as a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadEvent {
    pub bucket: String,
    pub path: Option<String>,
    pub content_type: Option<String>,
    pub size: Option<u64>,
    pub generation: Option<String>,
}

impl UploadEvent {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self { bucket: bucket.into(), path: None, content_type: None, size: None, generation: None }
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Object path, treating an empty name the same as an absent one
    pub fn object_path(&self) -> Option<&str> {
        self.path.as_deref().filter(|p| !p.is_empty())
    }

    /// Reference to the uploaded object, if the event names one
    pub fn object_ref(&self) -> Option<ObjectRef> {
        self.object_path().map(|path| ObjectRef::new(&self.bucket, path))
    }
}

/// Location of an object inside a bucket
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectRef {
    pub bucket: String,
    pub path: String,
}

impl ObjectRef {
    pub fn new(bucket: impl Into<String>, path: impl Into<String>) -> Self {
        Self { bucket: bucket.into(), path: path.into() }
    }

    /// Storage URI handed to the classifiers, e.g. `gs://uploads/posts/a.jpg`
    #[must_use]
    pub fn uri(&self) -> String {
        format!("gs://{}/{}", self.bucket, self.path)
    }

    /// Last path segment
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.path)
    }
}
