use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use upload_moderation_service::infrastructure::{
    config::{
        AppConfig, HandlerLimits, HandlersConfig, LogFormat, LoggingConfig, ReplaceStrategy,
        RuntimeMode, ServerConfig, SigningConfig, StorageConfig, StreamConfig,
        VideoIntelligenceConfig, VisionConfig,
    },
    http::create_app,
};
use upload_moderation_service::presentation::handlers::AppState;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

use super::test_app::TestApp;

pub const BUCKET: &str = "uploads";
pub const PUBLIC_BASE_URL: &str = "http://moderation.test";
pub const SIGNING_SECRET: &str = "integration-signing-secret";
pub const ACCOUNT_ID: &str = "account-1";
pub const STREAM_TOKEN: &str = "stream-token";
pub const IMAGE_PLACEHOLDER: &str = "placeholders/removed-image.jpg";
pub const VIDEO_PLACEHOLDER: &str = "placeholders/removed-video.mp4";
pub const IMAGE_PLACEHOLDER_BYTES: &[u8] = b"image placeholder bytes";
pub const VIDEO_PLACEHOLDER_BYTES: &[u8] = b"video placeholder bytes";
pub const OPERATION_NAME: &str = "projects/demo/locations/us-east1/operations/42";

/// A bucket directory seeded with both placeholders, plus a scratch directory
pub struct TestBucket {
    pub root: TempDir,
    pub scratch: TempDir,
}

impl TestBucket {
    pub fn new() -> Self {
        let bucket = Self { root: TempDir::new().unwrap(), scratch: TempDir::new().unwrap() };
        bucket.put(IMAGE_PLACEHOLDER, IMAGE_PLACEHOLDER_BYTES);
        bucket.put(VIDEO_PLACEHOLDER, VIDEO_PLACEHOLDER_BYTES);
        bucket
    }

    pub fn path_of(&self, object: &str) -> PathBuf {
        self.root.path().join(object)
    }

    pub fn put(&self, object: &str, content: &[u8]) {
        let file = self.path_of(object);
        std::fs::create_dir_all(file.parent().unwrap()).unwrap();
        std::fs::write(file, content).unwrap();
    }

    pub fn read(&self, object: &str) -> Option<Vec<u8>> {
        std::fs::read(self.path_of(object)).ok()
    }

    pub fn scratch_entries(&self) -> usize {
        count_entries(self.scratch.path())
    }
}

fn count_entries(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(Iterator::count).unwrap_or(0)
}

pub fn test_config(
    bucket: &TestBucket,
    vision_url: &str,
    video_url: &str,
    stream_url: &str,
) -> AppConfig {
    let limits = |timeout_seconds| HandlerLimits {
        timeout_seconds,
        memory_mb: 512,
        min_instances: 0,
        max_instances: 4,
    };

    AppConfig {
        mode: RuntimeMode::Local,
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            public_base_url: PUBLIC_BASE_URL.to_string(),
        },
        storage: StorageConfig {
            bucket: BUCKET.to_string(),
            base_path: bucket.root.path().display().to_string(),
            temp_path: bucket.scratch.path().display().to_string(),
            image_placeholder: IMAGE_PLACEHOLDER.to_string(),
            video_placeholder: VIDEO_PLACEHOLDER.to_string(),
            replace_strategy: ReplaceStrategy::DeleteThenUpload,
        },
        signing: SigningConfig { secret_key: SIGNING_SECRET.to_string(), url_ttl_seconds: 3600 },
        vision: VisionConfig {
            base_url: vision_url.to_string(),
            access_token: Some("vision-token".to_string()),
            request_timeout_seconds: 5,
        },
        video_intelligence: VideoIntelligenceConfig {
            base_url: video_url.to_string(),
            access_token: Some("video-token".to_string()),
            poll_interval_ms: 10,
            request_timeout_seconds: 5,
        },
        stream: StreamConfig {
            base_url: stream_url.to_string(),
            account_id: ACCOUNT_ID.to_string(),
            api_token: STREAM_TOKEN.to_string(),
            request_timeout_seconds: 5,
        },
        handlers: HandlersConfig { image: limits(30), video: limits(30) },
        logging: LoggingConfig {
            level: "debug".to_string(),
            filter: None,
            format: LogFormat::Compact,
        },
    }
}

/// The full service wired against mock remote services
pub struct TestEnv {
    pub bucket: TestBucket,
    pub vision: MockServer,
    pub video: MockServer,
    pub stream: MockServer,
    pub config: AppConfig,
    pub app: TestApp,
}

impl TestEnv {
    pub async fn start() -> Self {
        Self::start_with(ReplaceStrategy::DeleteThenUpload).await
    }

    pub async fn start_with(strategy: ReplaceStrategy) -> Self {
        Self::start_configured(|config| config.storage.replace_strategy = strategy).await
    }

    pub async fn start_configured(configure: impl FnOnce(&mut AppConfig)) -> Self {
        let bucket = TestBucket::new();
        let vision = MockServer::start().await;
        let video = MockServer::start().await;
        let stream = MockServer::start().await;

        let mut config = test_config(&bucket, &vision.uri(), &video.uri(), &stream.uri());
        configure(&mut config);

        let state = AppState::from_config(&config).unwrap();
        let app = TestApp::new(create_app(&config, state));

        Self { bucket, vision, video, stream, config, app }
    }

    pub async fn mount_safe_search(&self, adult: &str, violence: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/images:annotate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "responses": [{
                    "safeSearchAnnotation": {
                        "adult": adult,
                        "spoof": "VERY_UNLIKELY",
                        "medical": "UNLIKELY",
                        "violence": violence,
                        "racy": "POSSIBLE"
                    }
                }]
            })))
            .mount(&self.vision)
            .await;
    }

    pub async fn mount_explicit_frames(&self, likelihoods: &[&str]) {
        let frames: Vec<Value> = likelihoods
            .iter()
            .enumerate()
            .map(|(i, l)| json!({ "timeOffset": format!("{i}s"), "pornographyLikelihood": l }))
            .collect();

        Mock::given(method("POST"))
            .and(path("/v1/videos:annotate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": OPERATION_NAME
            })))
            .mount(&self.video)
            .await;

        Mock::given(method("GET"))
            .and(path(format!("/v1/{OPERATION_NAME}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": OPERATION_NAME,
                "done": true,
                "response": {
                    "@type": "type.googleapis.com/google.cloud.videointelligence.v1.AnnotateVideoResponse",
                    "annotationResults": [{
                        "inputUri": "/uploads/clip.mp4",
                        "explicitAnnotation": { "frames": frames }
                    }]
                }
            })))
            .mount(&self.video)
            .await;
    }

    pub async fn mount_stream_copy(&self, status: u16, body: Value) {
        Mock::given(method("POST"))
            .and(path(format!("/{ACCOUNT_ID}/stream/copy")))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.stream)
            .await;
    }
}

pub fn image_event(name: &str) -> Value {
    json!({
        "bucket": BUCKET,
        "name": name,
        "contentType": "image/jpeg",
        "size": "1024",
        "generation": "1700000000000000",
        "metageneration": "1"
    })
}

pub fn video_event(name: &str) -> Value {
    json!({
        "bucket": BUCKET,
        "name": name,
        "contentType": "video/mp4",
        "size": "4096",
        "generation": "1700000000000001"
    })
}
