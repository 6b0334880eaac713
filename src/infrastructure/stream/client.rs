use async_trait::async_trait;
use reqwest::Client as HttpClient;
use std::time::Duration;
use tracing::{debug, warn};

use super::models::{StreamCopyRequest, StreamEnvelope};
use crate::domain::services::{
    TranscodeCopy, TranscodeError, TranscodeReceipt, TranscodeSubmitter,
};
use crate::infrastructure::config::StreamConfig;

/// Client for the transcoding service's "copy from URL" endpoint
#[derive(Clone)]
pub struct StreamClient {
    config: StreamConfig,
    http_client: HttpClient,
}

impl StreamClient {
    pub fn new(config: StreamConfig) -> Result<Self, TranscodeError> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| TranscodeError::Request(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { config, http_client })
    }

    /// `{base_url}/{account_id}/stream/copy`
    pub fn copy_url(&self) -> String {
        let base_url = self.config.base_url.trim_end_matches('/');
        format!("{base_url}/{}/stream/copy", self.config.account_id)
    }
}

#[async_trait]
impl TranscodeSubmitter for StreamClient {
    async fn submit_copy(
        &self,
        request: &TranscodeCopy,
    ) -> Result<TranscodeReceipt, TranscodeError> {
        debug!(path = %request.path, "Submitting remote copy to transcoding service");

        let response = self
            .http_client
            .post(self.copy_url())
            .bearer_auth(&self.config.api_token)
            .json(&StreamCopyRequest::from(request))
            .send()
            .await
            .map_err(|e| TranscodeError::Request(e.to_string()))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| TranscodeError::Request(e.to_string()))?;

        if !status.is_success() {
            return Err(TranscodeError::Status { status: status.as_u16(), body });
        }

        let envelope = if body.trim().is_empty() {
            StreamEnvelope::default()
        } else {
            serde_json::from_str::<StreamEnvelope>(&body).unwrap_or_else(|e| {
                warn!("Unreadable transcoding service response: {}", e);
                StreamEnvelope::default()
            })
        };

        if envelope.success == Some(false) {
            return Err(TranscodeError::Refused(envelope.error_summary()));
        }

        Ok(TranscodeReceipt { uid: envelope.result.and_then(|video| video.uid) })
    }
}
