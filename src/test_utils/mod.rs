//! Test utilities for unit tests
//!
//! In-memory collaborators for the moderation use cases.

use std::sync::Arc;

use crate::application::use_cases::{
    ModerateImageUseCase, ModerateVideoUseCase, PlaceholderAssets, PlaceholderReplacer,
};
use crate::domain::entities::{ExplicitContentAnnotation, SafeSearchAnnotation};
use crate::infrastructure::config::{
    AppConfig, HandlerLimits, HandlersConfig, LogFormat, LoggingConfig, ReplaceStrategy,
    RuntimeMode, ServerConfig, SigningConfig, StorageConfig, StreamConfig,
    VideoIntelligenceConfig, VisionConfig,
};
use crate::infrastructure::storage::SignedUrlService;
use crate::presentation::handlers::AppState;

/// Configuration with placeholder paths matching the mocks below
pub fn test_config() -> AppConfig {
    let limits = |timeout_seconds| HandlerLimits {
        timeout_seconds,
        memory_mb: 256,
        min_instances: 0,
        max_instances: 4,
    };

    AppConfig {
        mode: RuntimeMode::Local,
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            public_base_url: "http://moderation.test".to_string(),
        },
        storage: StorageConfig {
            bucket: "uploads".to_string(),
            base_path: std::env::temp_dir().join("moderation-bucket").display().to_string(),
            temp_path: std::env::temp_dir().join("moderation-scratch").display().to_string(),
            image_placeholder: "placeholders/image.jpg".to_string(),
            video_placeholder: "placeholders/video.mp4".to_string(),
            replace_strategy: ReplaceStrategy::DeleteThenUpload,
        },
        signing: SigningConfig {
            secret_key: "test-signing-secret".to_string(),
            url_ttl_seconds: 3600,
        },
        vision: VisionConfig {
            base_url: "http://vision.test".to_string(),
            access_token: None,
            request_timeout_seconds: 5,
        },
        video_intelligence: VideoIntelligenceConfig {
            base_url: "http://video.test".to_string(),
            access_token: None,
            poll_interval_ms: 10,
            request_timeout_seconds: 5,
        },
        stream: StreamConfig {
            base_url: "http://stream.test".to_string(),
            account_id: "account".to_string(),
            api_token: "token".to_string(),
            request_timeout_seconds: 5,
        },
        handlers: HandlersConfig { image: limits(60), video: limits(540) },
        logging: LoggingConfig {
            level: "debug".to_string(),
            filter: None,
            format: LogFormat::Compact,
        },
    }
}

/// Application state over the given storage with clean-verdict classifiers
pub fn app_state(storage: Arc<mocks::InMemoryStorage>) -> AppState {
    let config = test_config();
    let placeholders = PlaceholderAssets::from_storage_config(&config.storage);
    let replacer = Arc::new(PlaceholderReplacer::new(
        storage.clone(),
        config.storage.temp_path(),
        config.storage.replace_strategy,
        placeholders.clone(),
    ));
    let signer = SignedUrlService::from_app_config(&config);

    AppState {
        image: Arc::new(ModerateImageUseCase::new(
            Arc::new(mocks::ScriptedSafeSearch::returning(SafeSearchAnnotation::default())),
            replacer.clone(),
        )),
        video: Arc::new(ModerateVideoUseCase::new(
            Arc::new(mocks::ScriptedExplicitContent::returning(
                ExplicitContentAnnotation::default(),
            )),
            replacer,
            signer.clone(),
            Arc::new(mocks::RecordingTranscoder::new()),
        )),
        storage,
        signer,
        placeholders,
    }
}

pub mod mocks {
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::path::Path;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::io::AsyncRead;

    use crate::domain::entities::{
        ExplicitContentAnnotation, ObjectRef, SafeSearchAnnotation,
    };
    use crate::domain::services::{
        ClassifierError, ExplicitContentDetector, SafeSearchDetector, TranscodeCopy,
        TranscodeError, TranscodeReceipt, TranscodeSubmitter,
    };
    use crate::infrastructure::storage::{ObjectMetadata, ObjectStorage, StorageError};

    /// Storage operation recorded by [`InMemoryStorage`]
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum StorageCall {
        Delete(String),
        Download(String),
        Upload(String),
    }

    /// Operation that [`InMemoryStorage`] should fail
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum FailOn {
        Delete,
        Download,
        Upload,
    }

    /// Bucket held in memory, recording every call
    #[derive(Default)]
    pub struct InMemoryStorage {
        bucket: String,
        objects: Mutex<HashMap<String, Vec<u8>>>,
        calls: Mutex<Vec<StorageCall>>,
        fail_on: Option<FailOn>,
    }

    impl InMemoryStorage {
        pub fn new(bucket: &str) -> Self {
            Self { bucket: bucket.to_string(), ..Self::default() }
        }

        #[must_use]
        pub fn with_object(self, path: &str, content: &[u8]) -> Self {
            self.objects.lock().unwrap().insert(path.to_string(), content.to_vec());
            self
        }

        #[must_use]
        pub fn failing_on(mut self, operation: FailOn) -> Self {
            self.fail_on = Some(operation);
            self
        }

        pub fn object(&self, path: &str) -> Option<Vec<u8>> {
            self.objects.lock().unwrap().get(path).cloned()
        }

        pub fn object_paths(&self) -> Vec<String> {
            let mut paths: Vec<_> = self.objects.lock().unwrap().keys().cloned().collect();
            paths.sort();
            paths
        }

        pub fn calls(&self) -> Vec<StorageCall> {
            self.calls.lock().unwrap().clone()
        }

        /// Deletes and uploads only
        pub fn mutations(&self) -> Vec<StorageCall> {
            self.calls()
                .into_iter()
                .filter(|call| !matches!(call, StorageCall::Download(_)))
                .collect()
        }

        fn record(&self, call: StorageCall) {
            self.calls.lock().unwrap().push(call);
        }

        fn check(&self, operation: FailOn) -> Result<(), StorageError> {
            if self.fail_on == Some(operation) {
                return Err(StorageError::IoError {
                    message: format!("Mock storage {operation:?} failure"),
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl ObjectStorage for InMemoryStorage {
        fn bucket(&self) -> &str {
            &self.bucket
        }

        async fn exists(&self, path: &str) -> Result<bool, StorageError> {
            Ok(self.objects.lock().unwrap().contains_key(path))
        }

        async fn delete(&self, path: &str) -> Result<bool, StorageError> {
            self.record(StorageCall::Delete(path.to_string()));
            self.check(FailOn::Delete)?;
            Ok(self.objects.lock().unwrap().remove(path).is_some())
        }

        async fn download_to_file(
            &self,
            path: &str,
            destination: &Path,
        ) -> Result<u64, StorageError> {
            self.record(StorageCall::Download(path.to_string()));
            self.check(FailOn::Download)?;

            let content = self
                .object(path)
                .ok_or_else(|| StorageError::ObjectNotFound { path: path.to_string() })?;
            tokio::fs::write(destination, &content).await?;
            Ok(content.len() as u64)
        }

        async fn upload_from_file(&self, source: &Path, path: &str) -> Result<u64, StorageError> {
            self.record(StorageCall::Upload(path.to_string()));
            self.check(FailOn::Upload)?;

            let content = tokio::fs::read(source).await?;
            let size = content.len() as u64;
            self.objects.lock().unwrap().insert(path.to_string(), content);
            Ok(size)
        }

        async fn open(
            &self,
            path: &str,
        ) -> Result<Box<dyn AsyncRead + Send + Unpin>, StorageError> {
            let content = self
                .object(path)
                .ok_or_else(|| StorageError::ObjectNotFound { path: path.to_string() })?;
            Ok(Box::new(std::io::Cursor::new(content)))
        }

        async fn metadata(&self, path: &str) -> Result<ObjectMetadata, StorageError> {
            let content = self
                .object(path)
                .ok_or_else(|| StorageError::ObjectNotFound { path: path.to_string() })?;
            Ok(ObjectMetadata {
                size: content.len() as u64,
                content_type: "application/octet-stream".to_string(),
                last_modified: std::time::SystemTime::now(),
            })
        }
    }

    /// Safe-search detector returning a fixed verdict
    pub struct ScriptedSafeSearch {
        verdict: Result<SafeSearchAnnotation, String>,
        calls: AtomicUsize,
    }

    impl ScriptedSafeSearch {
        pub fn returning(annotation: SafeSearchAnnotation) -> Self {
            Self { verdict: Ok(annotation), calls: AtomicUsize::new(0) }
        }

        pub fn failing(message: &str) -> Self {
            Self { verdict: Err(message.to_string()), calls: AtomicUsize::new(0) }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SafeSearchDetector for ScriptedSafeSearch {
        async fn detect_safe_search(
            &self,
            _object: &ObjectRef,
        ) -> Result<SafeSearchAnnotation, ClassifierError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.verdict.clone().map_err(ClassifierError::Request)
        }
    }

    /// Explicit-content detector returning a fixed verdict
    pub struct ScriptedExplicitContent {
        verdict: Result<ExplicitContentAnnotation, String>,
        calls: AtomicUsize,
    }

    impl ScriptedExplicitContent {
        pub fn returning(annotation: ExplicitContentAnnotation) -> Self {
            Self { verdict: Ok(annotation), calls: AtomicUsize::new(0) }
        }

        pub fn failing(message: &str) -> Self {
            Self { verdict: Err(message.to_string()), calls: AtomicUsize::new(0) }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ExplicitContentDetector for ScriptedExplicitContent {
        async fn detect_explicit_content(
            &self,
            _object: &ObjectRef,
        ) -> Result<ExplicitContentAnnotation, ClassifierError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.verdict.clone().map_err(ClassifierError::Request)
        }
    }

    /// Transcoder that records every submitted copy
    #[derive(Default)]
    pub struct RecordingTranscoder {
        requests: Mutex<Vec<TranscodeCopy>>,
        fail: bool,
    }

    impl RecordingTranscoder {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing() -> Self {
            Self { fail: true, ..Self::default() }
        }

        pub fn requests(&self) -> Vec<TranscodeCopy> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TranscodeSubmitter for RecordingTranscoder {
        async fn submit_copy(
            &self,
            request: &TranscodeCopy,
        ) -> Result<TranscodeReceipt, TranscodeError> {
            self.requests.lock().unwrap().push(request.clone());
            if self.fail {
                return Err(TranscodeError::Status { status: 503, body: "unavailable".to_string() });
            }
            Ok(TranscodeReceipt { uid: Some("stream-uid-1".to_string()) })
        }
    }
}
