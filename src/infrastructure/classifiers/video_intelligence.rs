use async_trait::async_trait;
use reqwest::{Client as HttpClient, RequestBuilder};
use tokio::time::sleep;
use tracing::debug;

use super::{
    build_http_client,
    models::{AnnotateVideoRequest, Operation},
    read_json,
};
use crate::domain::{
    entities::{ExplicitContentAnnotation, ObjectRef},
    services::{ClassifierError, ExplicitContentDetector},
};
use crate::infrastructure::config::VideoIntelligenceConfig;

/// Explicit-content detection through the video annotation REST API
///
/// Annotation runs as a long-running operation. The client polls it until it
/// reports `done`; the only bound on the wait is the caller's own deadline.
#[derive(Clone)]
pub struct VideoIntelligenceClient {
    config: VideoIntelligenceConfig,
    http_client: HttpClient,
}

impl VideoIntelligenceClient {
    pub fn new(config: VideoIntelligenceConfig) -> Result<Self, ClassifierError> {
        let http_client = build_http_client(config.request_timeout_seconds)?;
        Ok(Self { config, http_client })
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn start(&self, uri: &str) -> Result<Operation, ClassifierError> {
        let request = self
            .http_client
            .post(format!("{}/v1/videos:annotate", self.base_url()))
            .json(&AnnotateVideoRequest::explicit_content(uri.to_string()));

        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| ClassifierError::Request(e.to_string()))?;
        read_json(response).await
    }

    async fn poll(&self, name: &str) -> Result<Operation, ClassifierError> {
        let request = self.http_client.get(format!("{}/v1/{}", self.base_url(), name));

        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| ClassifierError::Request(e.to_string()))?;
        read_json(response).await
    }
}

#[async_trait]
impl ExplicitContentDetector for VideoIntelligenceClient {
    async fn detect_explicit_content(
        &self,
        object: &ObjectRef,
    ) -> Result<ExplicitContentAnnotation, ClassifierError> {
        let uri = object.uri();
        let mut operation = self.start(&uri).await?;
        debug!(%uri, operation = %operation.name, "Started explicit content annotation");

        let mut polls: u32 = 0;
        while !operation.done {
            sleep(self.config.poll_interval()).await;
            polls += 1;
            operation = self.poll(&operation.name).await?;
        }
        debug!(%uri, operation = %operation.name, polls, "Explicit content annotation finished");

        if let Some(status) = operation.error {
            return Err(ClassifierError::Rejected { uri, message: status.message });
        }

        let response = operation.response.unwrap_or_default();
        if let Some(status) = response.annotation_results.iter().find_map(|r| r.error.as_ref()) {
            return Err(ClassifierError::Rejected { uri, message: status.message.clone() });
        }

        Ok(response.into_annotation())
    }
}
