use std::sync::Arc;
use tracing::{error, info, warn};

use super::moderation::accept_event;
use super::replace_with_placeholder::PlaceholderReplacer;
use crate::{
    application::dto::ModerationOutcome,
    domain::{
        entities::ObjectRef,
        entities::UploadEvent,
        services::{ExplicitContentDetector, TranscodeCopy, TranscodeSubmitter},
        value_objects::MediaKind,
    },
    infrastructure::storage::SignedUrlService,
    presentation::middleware::error::AppError,
};

/// Moderates newly uploaded videos and forwards clean ones for transcoding
///
/// A video with any frame rated `POSSIBLE` or above for pornography is
/// replaced by the video placeholder. A clean video gets a signed read URL
/// and is submitted to the transcoding service as a copy-from-URL job.
pub struct ModerateVideoUseCase {
    detector: Arc<dyn ExplicitContentDetector>,
    replacer: Arc<PlaceholderReplacer>,
    signer: SignedUrlService,
    transcoder: Arc<dyn TranscodeSubmitter>,
}

impl ModerateVideoUseCase {
    pub fn new(
        detector: Arc<dyn ExplicitContentDetector>,
        replacer: Arc<PlaceholderReplacer>,
        signer: SignedUrlService,
        transcoder: Arc<dyn TranscodeSubmitter>,
    ) -> Self {
        Self { detector, replacer, signer, transcoder }
    }

    /// Handle one "object finalized" event
    ///
    /// # Errors
    /// * `ExternalService` - Classification or the transcode submission failed
    /// * `Storage` - Replacing a flagged video failed part way
    /// * `Internal` - The read URL could not be signed
    pub async fn execute(&self, event: &UploadEvent) -> Result<ModerationOutcome, AppError> {
        let placeholders = self.replacer.placeholders();
        let object = match accept_event(MediaKind::Video, event, placeholders) {
            Ok(object) => object,
            Err(skipped) => return Ok(skipped),
        };

        info!(uri = %object.uri(), "Starting explicit content detection");
        let annotation = self.detector.detect_explicit_content(&object).await.map_err(|e| {
            error!(uri = %object.uri(), "Explicit content detection failed: {}", e);
            AppError::classifier("explicit-content", &e)
        })?;

        info!(
            path = %object.path,
            frames = annotation.frames.len(),
            flagged_frames = annotation.flagged_frames(),
            peak = %annotation.peak(),
            "Explicit content annotation received"
        );

        if annotation.is_flagged() {
            warn!(path = %object.path, "Video flagged, replacing with placeholder");
            let placeholder = placeholders.for_kind(MediaKind::Video).to_string();
            self.replacer.replace(&object.path, &placeholder).await.inspect_err(|e| {
                error!(path = %object.path, "Failed to replace flagged video: {}", e);
            })?;
            return Ok(ModerationOutcome::Replaced { path: object.path, placeholder });
        }

        let receipt = self.forward(&object).await?;
        Ok(ModerationOutcome::Forwarded { path: object.path, transcode_uid: receipt })
    }

    async fn forward(&self, object: &ObjectRef) -> Result<Option<String>, AppError> {
        let signed = self.signer.sign_read_url(&object.path).map_err(|e| {
            error!(path = %object.path, "Failed to sign read URL: {}", e);
            AppError::Internal { message: format!("Failed to sign read URL: {e}") }
        })?;

        let copy = TranscodeCopy {
            source_url: signed.url,
            name: object.file_name().to_string(),
            path: object.path.clone(),
            content_uri: object.uri(),
            content_ref: object.to_string(),
        };

        let receipt = self.transcoder.submit_copy(&copy).await.map_err(|e| {
            error!(path = %object.path, "Transcode submission failed: {}", e);
            AppError::from(e)
        })?;

        info!(
            path = %object.path,
            uid = receipt.uid.as_deref().unwrap_or("<unknown>"),
            url_expires_at = %signed.expires_at,
            "Video forwarded for transcoding"
        );
        Ok(receipt.uid)
    }
}
