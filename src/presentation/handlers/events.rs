use axum::{extract::State, response::Json};
use tracing::{info, warn};

use super::AppState;
use crate::{
    application::dto::{ModerationOutcome, StorageObjectData},
    domain::entities::UploadEvent,
    presentation::middleware::error::AppError,
};

/// Image pipeline trigger
///
/// # Errors
/// Any failure maps to a 5xx so the event is redelivered
pub async fn moderate_image(
    State(state): State<AppState>,
    Json(payload): Json<StorageObjectData>,
) -> Result<Json<ModerationOutcome>, AppError> {
    let event = payload.into_event(state.storage.bucket());
    if let Some(skipped) = foreign_bucket(&state, &event) {
        return Ok(Json(skipped));
    }

    let outcome = state.image.execute(&event).await?;
    info!(
        path = event.object_path().unwrap_or_default(),
        generation = event.generation.as_deref().unwrap_or_default(),
        size = event.size,
        outcome = outcome.label(),
        "Image event handled"
    );
    Ok(Json(outcome))
}

/// Video pipeline trigger
///
/// # Errors
/// Any failure maps to a 5xx so the event is redelivered
pub async fn moderate_video(
    State(state): State<AppState>,
    Json(payload): Json<StorageObjectData>,
) -> Result<Json<ModerationOutcome>, AppError> {
    let event = payload.into_event(state.storage.bucket());
    if let Some(skipped) = foreign_bucket(&state, &event) {
        return Ok(Json(skipped));
    }

    let outcome = state.video.execute(&event).await?;
    info!(
        path = event.object_path().unwrap_or_default(),
        generation = event.generation.as_deref().unwrap_or_default(),
        size = event.size,
        outcome = outcome.label(),
        "Video event handled"
    );
    Ok(Json(outcome))
}

fn foreign_bucket(state: &AppState, event: &UploadEvent) -> Option<ModerationOutcome> {
    let served = state.storage.bucket();
    if event.bucket == served {
        return None;
    }

    warn!(bucket = %event.bucket, served, "Ignoring event for a bucket this service does not serve");
    Some(ModerationOutcome::skipped(format!("bucket {} is not served", event.bucket)))
}
