use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncRead, BufReader};

use super::{
    ObjectMetadata, ObjectStorage, StorageError,
    utils::{content_type_for_path, resolve_object_path},
};

/// Bucket backed by a directory, such as a volume-mounted storage bucket
#[derive(Clone)]
pub struct FilesystemStorage {
    bucket: String,
    base_path: PathBuf,
}

impl FilesystemStorage {
    /// Create a new filesystem storage instance
    pub fn new(bucket: impl Into<String>, base_path: impl Into<PathBuf>) -> Self {
        Self { bucket: bucket.into(), base_path: base_path.into() }
    }

    fn full_path(&self, object_path: &str) -> Result<PathBuf, StorageError> {
        resolve_object_path(&self.base_path, object_path)
    }

    fn not_found(object_path: &str) -> StorageError {
        StorageError::ObjectNotFound { path: object_path.to_string() }
    }

    /// Ensure directory structure exists for a file
    async fn ensure_directory(file_path: &Path) -> Result<(), StorageError> {
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStorage for FilesystemStorage {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn exists(&self, path: &str) -> Result<bool, StorageError> {
        let file_path = self.full_path(path)?;
        Ok(fs::try_exists(&file_path).await?)
    }

    async fn delete(&self, path: &str) -> Result<bool, StorageError> {
        let file_path = self.full_path(path)?;

        match fs::remove_file(&file_path).await {
            Ok(()) => {
                tracing::debug!(bucket = %self.bucket, path, "Deleted object");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn download_to_file(&self, path: &str, destination: &Path) -> Result<u64, StorageError> {
        let file_path = self.full_path(path)?;

        match fs::copy(&file_path, destination).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                if fs::try_exists(&file_path).await? {
                    // Source exists, so the destination directory is missing
                    Err(e.into())
                } else {
                    Err(Self::not_found(path))
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn upload_from_file(&self, source: &Path, path: &str) -> Result<u64, StorageError> {
        let file_path = self.full_path(path)?;
        Self::ensure_directory(&file_path).await?;

        // Write next to the target first so the replace is a single rename
        let staging_path = file_path.with_file_name(format!(
            ".{}.{}.upload",
            file_path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default(),
            uuid::Uuid::new_v4().simple()
        ));

        let bytes = match fs::copy(source, &staging_path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                let _ = fs::remove_file(&staging_path).await;
                return Err(e.into());
            }
        };

        if let Err(e) = fs::rename(&staging_path, &file_path).await {
            let _ = fs::remove_file(&staging_path).await;
            return Err(e.into());
        }

        tracing::debug!(bucket = %self.bucket, path, bytes, "Uploaded object");
        Ok(bytes)
    }

    async fn open(&self, path: &str) -> Result<Box<dyn AsyncRead + Send + Unpin>, StorageError> {
        let file_path = self.full_path(path)?;

        match fs::File::open(&file_path).await {
            Ok(file) => Ok(Box::new(BufReader::new(file))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Self::not_found(path)),
            Err(e) => Err(e.into()),
        }
    }

    async fn metadata(&self, path: &str) -> Result<ObjectMetadata, StorageError> {
        let file_path = self.full_path(path)?;

        let metadata = match fs::metadata(&file_path).await {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => return Err(Self::not_found(path)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Self::not_found(path));
            }
            Err(e) => return Err(e.into()),
        };

        Ok(ObjectMetadata {
            size: metadata.len(),
            content_type: content_type_for_path(path).to_string(),
            last_modified: metadata.modified().unwrap_or(std::time::SystemTime::UNIX_EPOCH),
        })
    }
}
