use std::path::{Component, Path, PathBuf};

use super::StorageError;

/// Check that an object path is relative, `/`-separated and stays inside the bucket
pub fn is_valid_object_path(object_path: &str) -> bool {
    !object_path.is_empty()
        && !object_path.ends_with('/')
        && Path::new(object_path).components().all(|c| matches!(c, Component::Normal(_)))
}

/// Resolve an object path to a location under the bucket root
pub fn resolve_object_path(root: &Path, object_path: &str) -> Result<PathBuf, StorageError> {
    if !is_valid_object_path(object_path) {
        return Err(StorageError::InvalidPath { path: object_path.to_string() });
    }

    Ok(root.join(object_path))
}

/// Guess a MIME type from an object path's extension
pub fn content_type_for_path(object_path: &str) -> &'static str {
    let extension = object_path
        .rsplit('/')
        .next()
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_lowercase());

    match extension.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("avif") => "image/avif",
        Some("heic") => "image/heic",
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("mov") => "video/quicktime",
        Some("avi") => "video/x-msvideo",
        Some("mkv") => "video/x-matroska",
        _ => "application/octet-stream",
    }
}
