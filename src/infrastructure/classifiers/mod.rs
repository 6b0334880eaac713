//! Remote content-safety classifiers
//!
//! - [`VisionClient`]: image safe-search detection
//! - [`VideoIntelligenceClient`]: video explicit-content detection

pub mod models;
mod video_intelligence;
mod vision;

pub use video_intelligence::VideoIntelligenceClient;
pub use vision::VisionClient;

use reqwest::{Client as HttpClient, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::domain::services::ClassifierError;

fn build_http_client(timeout_seconds: u64) -> Result<HttpClient, ClassifierError> {
    HttpClient::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .build()
        .map_err(|e| ClassifierError::Request(format!("Failed to create HTTP client: {e}")))
}

/// Decode a JSON body, turning non-success statuses into errors
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ClassifierError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
        return Err(ClassifierError::Status { status: status.as_u16(), body });
    }

    response.json::<T>().await.map_err(|e| ClassifierError::MalformedResponse(e.to_string()))
}
