use async_trait::async_trait;
use std::path::Path;
use tokio::io::AsyncRead;

mod filesystem_storage;
pub mod signed_urls;
pub mod utils;

pub use filesystem_storage::FilesystemStorage;
pub use signed_urls::{SignedUrl, SignedUrlError, SignedUrlService};
pub use utils::*;

/// Error types for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Object not found: {path}")]
    ObjectNotFound { path: String },

    #[error("IO error: {message}")]
    IoError { message: String },

    #[error("Invalid object path: {path}")]
    InvalidPath { path: String },
}

impl From<std::io::Error> for StorageError {
    fn from(error: std::io::Error) -> Self {
        StorageError::IoError { message: error.to_string() }
    }
}

/// Object operations the moderation pipelines need from a bucket
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Name of the bucket this storage serves
    fn bucket(&self) -> &str;

    /// Check if an object exists
    async fn exists(&self, path: &str) -> Result<bool, StorageError>;

    /// Delete an object, returning `false` if it was already absent
    async fn delete(&self, path: &str) -> Result<bool, StorageError>;

    /// Copy an object's bytes into a local file, returning the byte count
    async fn download_to_file(&self, path: &str, destination: &Path) -> Result<u64, StorageError>;

    /// Write a local file's bytes to an object, replacing any existing object
    async fn upload_from_file(&self, source: &Path, path: &str) -> Result<u64, StorageError>;

    /// Open an object for streaming reads
    async fn open(&self, path: &str) -> Result<Box<dyn AsyncRead + Send + Unpin>, StorageError>;

    /// Get metadata about a stored object
    async fn metadata(&self, path: &str) -> Result<ObjectMetadata, StorageError>;
}

/// Object metadata information
#[derive(Debug, Clone)]
pub struct ObjectMetadata {
    pub size: u64,
    pub content_type: String,
    pub last_modified: std::time::SystemTime,
}
