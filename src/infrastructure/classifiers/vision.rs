use async_trait::async_trait;
use reqwest::Client as HttpClient;
use tracing::debug;

use super::{
    build_http_client,
    models::{BatchAnnotateImagesRequest, BatchAnnotateImagesResponse},
    read_json,
};
use crate::domain::{
    entities::{ObjectRef, SafeSearchAnnotation},
    services::{ClassifierError, SafeSearchDetector},
};
use crate::infrastructure::config::VisionConfig;

/// Safe-search detection through the image annotation REST API
#[derive(Clone)]
pub struct VisionClient {
    config: VisionConfig,
    http_client: HttpClient,
}

impl VisionClient {
    pub fn new(config: VisionConfig) -> Result<Self, ClassifierError> {
        let http_client = build_http_client(config.request_timeout_seconds)?;
        Ok(Self { config, http_client })
    }

    fn annotate_url(&self) -> String {
        format!("{}/v1/images:annotate", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl SafeSearchDetector for VisionClient {
    async fn detect_safe_search(
        &self,
        object: &ObjectRef,
    ) -> Result<SafeSearchAnnotation, ClassifierError> {
        let uri = object.uri();
        debug!(%uri, "Requesting safe-search detection");

        let mut request = self
            .http_client
            .post(self.annotate_url())
            .json(&BatchAnnotateImagesRequest::safe_search(uri.clone()));
        if let Some(token) = &self.config.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| ClassifierError::Request(e.to_string()))?;
        let batch: BatchAnnotateImagesResponse = read_json(response).await?;

        let result = batch.responses.into_iter().next().ok_or_else(|| {
            ClassifierError::MalformedResponse("empty responses array".to_string())
        })?;

        if let Some(status) = result.error {
            return Err(ClassifierError::Rejected { uri, message: status.message });
        }

        result.safe_search_annotation.map(Into::into).ok_or_else(|| {
            ClassifierError::MalformedResponse("missing safeSearchAnnotation".to_string())
        })
    }
}
