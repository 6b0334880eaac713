use tracing::{info, warn};

use crate::application::dto::ModerationOutcome;
use crate::domain::{
    entities::{ObjectRef, UploadEvent},
    value_objects::MediaKind,
};
use crate::infrastructure::{config::StorageConfig, storage::is_valid_object_path};

/// Fixed placeholder objects that stand in for removed content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderAssets {
    pub image: String,
    pub video: String,
}

impl PlaceholderAssets {
    pub fn new(image: impl Into<String>, video: impl Into<String>) -> Self {
        Self { image: image.into(), video: video.into() }
    }

    pub fn from_storage_config(config: &StorageConfig) -> Self {
        Self::new(config.image_placeholder.clone(), config.video_placeholder.clone())
    }

    pub fn for_kind(&self, kind: MediaKind) -> &str {
        match kind {
            MediaKind::Image => &self.image,
            MediaKind::Video => &self.video,
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        path == self.image || path == self.video
    }
}

/// Decide whether a pipeline handles an event
///
/// Returns the object to moderate, or the `Skipped` outcome for events
/// without a path, with a content type of another kind, naming one of the
/// placeholder assets, or with a path the bucket can never hold.
pub fn accept_event(
    kind: MediaKind,
    event: &UploadEvent,
    placeholders: &PlaceholderAssets,
) -> Result<ObjectRef, ModerationOutcome> {
    let Some(object) = event.object_ref() else {
        info!(bucket = %event.bucket, pipeline = %kind, "{}", kind.skip_message());
        return Err(ModerationOutcome::skipped("missing object path"));
    };

    if !kind.accepts(event.content_type.as_deref()) {
        info!(
            bucket = %object.bucket,
            path = %object.path,
            content_type = event.content_type.as_deref().unwrap_or("<none>"),
            "{}",
            kind.skip_message()
        );
        return Err(ModerationOutcome::skipped(kind.skip_message()));
    }

    if placeholders.contains(&object.path) {
        info!(path = %object.path, "Ignoring upload of a placeholder asset");
        return Err(ModerationOutcome::skipped("placeholder asset"));
    }

    if !is_valid_object_path(&object.path) {
        warn!(path = %object.path, "Ignoring event for an object path outside the bucket");
        return Err(ModerationOutcome::skipped("invalid object path"));
    }

    Ok(object)
}
