use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::moderation::PlaceholderAssets;
use crate::{
    infrastructure::{
        config::ReplaceStrategy,
        storage::{ObjectStorage, StorageError},
    },
    presentation::middleware::error::AppError,
};

/// Swaps a flagged object for a placeholder asset from the same bucket
///
/// With [`ReplaceStrategy::DeleteThenUpload`] the original is deleted first,
/// and nothing restores it if the placeholder copy then fails: the path stays
/// empty until the event is retried. [`ReplaceStrategy::Overwrite`] skips the
/// delete and relies on the upload replacing the object in place.
pub struct PlaceholderReplacer {
    storage: Arc<dyn ObjectStorage>,
    scratch_root: PathBuf,
    strategy: ReplaceStrategy,
    placeholders: PlaceholderAssets,
}

impl PlaceholderReplacer {
    pub fn new(
        storage: Arc<dyn ObjectStorage>,
        scratch_root: impl Into<PathBuf>,
        strategy: ReplaceStrategy,
        placeholders: PlaceholderAssets,
    ) -> Self {
        Self { storage, scratch_root: scratch_root.into(), strategy, placeholders }
    }

    pub fn placeholders(&self) -> &PlaceholderAssets {
        &self.placeholders
    }

    /// Put the bytes of `placeholder` at `target`
    ///
    /// The placeholder is staged in a scratch directory created for this call.
    /// Failing to clean the scratch file up after a successful upload is
    /// logged but does not fail the replacement.
    pub async fn replace(&self, target: &str, placeholder: &str) -> Result<(), AppError> {
        if self.strategy == ReplaceStrategy::DeleteThenUpload {
            let existed = self
                .storage
                .delete(target)
                .await
                .map_err(|e| storage_failure("delete original", &e))?;
            debug!(path = target, existed, "Deleted flagged object");
        }

        tokio::fs::create_dir_all(&self.scratch_root).await?;
        let scratch = tempfile::Builder::new().prefix("placeholder-").tempdir_in(&self.scratch_root)?;
        let file_name = placeholder.rsplit('/').next().unwrap_or("placeholder");
        let local_file = scratch.path().join(file_name);

        let bytes = self
            .storage
            .download_to_file(placeholder, &local_file)
            .await
            .map_err(|e| storage_failure("download placeholder", &e))?;

        self.storage
            .upload_from_file(&local_file, target)
            .await
            .map_err(|e| storage_failure("upload placeholder", &e))?;

        if let Err(e) = tokio::fs::remove_file(&local_file).await {
            warn!(file = %local_file.display(), "Failed to remove staged placeholder: {}", e);
        }
        if let Err(e) = scratch.close() {
            warn!("Failed to remove scratch directory: {}", e);
        }

        info!(path = target, placeholder, bytes, "Replaced flagged object with placeholder");
        Ok(())
    }
}

fn storage_failure(step: &str, err: &StorageError) -> AppError {
    AppError::Storage { message: format!("{step} failed: {err}") }
}
