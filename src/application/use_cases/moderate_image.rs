use std::sync::Arc;
use tracing::{error, info, warn};

use super::moderation::accept_event;
use super::replace_with_placeholder::PlaceholderReplacer;
use crate::{
    application::dto::ModerationOutcome,
    domain::{entities::UploadEvent, services::SafeSearchDetector, value_objects::MediaKind},
    presentation::middleware::error::AppError,
};

/// Moderates newly uploaded images
///
/// Images rated adult or violent at `POSSIBLE` or above are replaced in place
/// by the image placeholder. Anything else is left untouched.
pub struct ModerateImageUseCase {
    detector: Arc<dyn SafeSearchDetector>,
    replacer: Arc<PlaceholderReplacer>,
}

impl ModerateImageUseCase {
    pub fn new(detector: Arc<dyn SafeSearchDetector>, replacer: Arc<PlaceholderReplacer>) -> Self {
        Self { detector, replacer }
    }

    /// Handle one "object finalized" event
    ///
    /// # Errors
    /// * `ExternalService` - The safe-search call failed
    /// * `Storage` - Replacing a flagged image failed part way
    pub async fn execute(&self, event: &UploadEvent) -> Result<ModerationOutcome, AppError> {
        let placeholders = self.replacer.placeholders();
        let object = match accept_event(MediaKind::Image, event, placeholders) {
            Ok(object) => object,
            Err(skipped) => return Ok(skipped),
        };

        let annotation = self.detector.detect_safe_search(&object).await.map_err(|e| {
            error!(uri = %object.uri(), "Safe-search detection failed: {}", e);
            AppError::classifier("safe-search", &e)
        })?;

        info!(
            path = %object.path,
            adult = %annotation.adult,
            violence = %annotation.violence,
            "Safe-search annotation received"
        );

        if !annotation.is_flagged() {
            return Ok(ModerationOutcome::Approved { path: object.path });
        }

        warn!(path = %object.path, "Image flagged, replacing with placeholder");
        let placeholder = placeholders.for_kind(MediaKind::Image).to_string();
        self.replacer.replace(&object.path, &placeholder).await.inspect_err(|e| {
            error!(path = %object.path, "Failed to replace flagged image: {}", e);
        })?;

        Ok(ModerationOutcome::Replaced { path: object.path, placeholder })
    }
}
