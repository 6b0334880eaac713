use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tokio_util::io::ReaderStream;
use tracing::debug;

use super::AppState;
use crate::presentation::middleware::error::AppError;

/// Query parameters carried by a signed read URL
#[derive(Debug, Deserialize)]
pub struct SignedDownloadQuery {
    pub expires: i64,
    pub signature: String,
}

/// Stream an object to a holder of a valid signed URL
///
/// This is the URL handed to the transcoding service for clean videos.
///
/// # Errors
/// * `Authentication` - Signature does not match the path and expiry
/// * `Gone` - The URL has expired
/// * `NotFound` - The object no longer exists
pub async fn download_object(
    State(state): State<AppState>,
    Path(object_path): Path<String>,
    Query(query): Query<SignedDownloadQuery>,
) -> Result<Response, AppError> {
    state.signer.verify(&object_path, query.expires, &query.signature)?;

    let metadata = state.storage.metadata(&object_path).await?;
    let reader = state.storage.open(&object_path).await?;
    debug!(path = %object_path, size = metadata.size, "Serving signed download");

    let headers = [
        (header::CONTENT_TYPE, metadata.content_type),
        (header::CONTENT_LENGTH, metadata.size.to_string()),
        (header::CACHE_CONTROL, "private, no-store".to_string()),
    ];

    Ok((headers, Body::from_stream(ReaderStream::new(reader))).into_response())
}
