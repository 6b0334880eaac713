use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Signing secret used when none is configured; rejected in production
pub const DEVELOPMENT_SIGNING_SECRET: &str = "default-dev-secret-change-in-production";

/// Runtime mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeMode {
    Local,
    Production,
}

impl std::fmt::Display for RuntimeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for RuntimeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(format!("Invalid runtime mode: {s}. Valid values: local, production")),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub mode: RuntimeMode,
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub signing: SigningConfig,
    pub vision: VisionConfig,
    pub video_intelligence: VideoIntelligenceConfig,
    pub stream: StreamConfig,
    pub handlers: HandlersConfig,
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Externally reachable base URL, used when building signed download URLs
    pub public_base_url: String,
}

/// How a flagged object is swapped for its placeholder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplaceStrategy {
    /// Delete the original, then upload the placeholder to the same path.
    /// The path is empty between the two steps.
    DeleteThenUpload,
    /// Upload the placeholder over the original in one atomic replace
    Overwrite,
}

/// Bucket configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub bucket: String,
    /// Directory the bucket is mounted at
    pub base_path: String,
    /// Parent directory for per-invocation scratch directories
    pub temp_path: String,
    pub image_placeholder: String,
    pub video_placeholder: String,
    pub replace_strategy: ReplaceStrategy,
}

/// Signed download URL configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigningConfig {
    pub secret_key: String,
    pub url_ttl_seconds: u64,
}

/// Image safe-search API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionConfig {
    pub base_url: String,
    pub access_token: Option<String>,
    pub request_timeout_seconds: u64,
}

/// Video annotation API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoIntelligenceConfig {
    pub base_url: String,
    pub access_token: Option<String>,
    /// Delay between polls of a running annotation job
    pub poll_interval_ms: u64,
    pub request_timeout_seconds: u64,
}

/// Transcoding service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    pub base_url: String,
    pub account_id: String,
    pub api_token: String,
    pub request_timeout_seconds: u64,
}

/// Per-handler hosting limits
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HandlerLimits {
    /// Wall-clock budget for one invocation
    pub timeout_seconds: u64,
    /// Memory ceiling of the deployment (informational)
    pub memory_mb: u32,
    /// Warm instances kept by the deployment (informational)
    pub min_instances: u32,
    /// Maximum invocations handled concurrently
    pub max_instances: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandlersConfig {
    pub image: HandlerLimits,
    pub video: HandlerLimits,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub filter: Option<String>,
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
    Compact,
}

impl AppConfig {
    /// Load configuration based on runtime mode
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or invalid
    pub fn load() -> Result<Self, config::ConfigError> {
        // Detect runtime mode from environment (default: local)
        let mode = std::env::var("RUN_MODE")
            .unwrap_or_else(|_| "local".to_string())
            .parse::<RuntimeMode>()
            .map_err(config::ConfigError::Message)?;

        Self::load_for_mode(mode)
    }

    /// Load configuration for a specific runtime mode
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or invalid
    pub fn load_for_mode(mode: RuntimeMode) -> Result<Self, config::ConfigError> {
        if mode == RuntimeMode::Local {
            dotenvy::from_filename(".env.local").ok();
        }

        // MODERATION__STREAM__API_TOKEN -> stream.api_token
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("MODERATION").prefix_separator("__").separator("__"),
        );

        let (base_path, temp_path, log_format) = match mode {
            RuntimeMode::Local => ("./bucket", "./bucket-tmp", "pretty"),
            RuntimeMode::Production => ("/mnt/bucket", "/tmp", "json"),
        };

        let settings = builder
            .set_default("mode", mode.to_string())?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.public_base_url", "http://localhost:8080")?
            .set_default("storage.bucket", "uploads")?
            .set_default("storage.base_path", base_path)?
            .set_default("storage.temp_path", temp_path)?
            .set_default("storage.image_placeholder", "placeholders/removed-image.jpg")?
            .set_default("storage.video_placeholder", "placeholders/removed-video.mp4")?
            .set_default("storage.replace_strategy", "delete_then_upload")?
            .set_default("signing.secret_key", DEVELOPMENT_SIGNING_SECRET)?
            .set_default("signing.url_ttl_seconds", 3600)? // 1 hour
            .set_default("vision.base_url", "https://vision.googleapis.com")?
            .set_default("vision.access_token", None::<String>)?
            .set_default("vision.request_timeout_seconds", 30)?
            .set_default("video_intelligence.base_url", "https://videointelligence.googleapis.com")?
            .set_default("video_intelligence.access_token", None::<String>)?
            .set_default("video_intelligence.poll_interval_ms", 5000)?
            .set_default("video_intelligence.request_timeout_seconds", 30)?
            .set_default("stream.base_url", "https://api.cloudflare.com/client/v4/accounts")?
            .set_default("stream.account_id", "")?
            .set_default("stream.api_token", "")?
            .set_default("stream.request_timeout_seconds", 30)?
            .set_default("handlers.image.timeout_seconds", 60)?
            .set_default("handlers.image.memory_mb", 512)?
            .set_default("handlers.image.min_instances", 0)?
            .set_default("handlers.image.max_instances", 10)?
            .set_default("handlers.video.timeout_seconds", 540)?
            .set_default("handlers.video.memory_mb", 1024)?
            .set_default("handlers.video.min_instances", 0)?
            .set_default("handlers.video.max_instances", 5)?
            .set_default("logging.level", "info")?
            .set_default("logging.filter", None::<String>)?
            .set_default("logging.format", log_format)?
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints that serde cannot express
    ///
    /// # Errors
    /// Returns `ConfigError::Message` describing the first invalid value
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        let invalid = |message: &str| Err(config::ConfigError::Message(message.to_string()));

        if format!("{}:{}", self.server.host, self.server.port).parse::<SocketAddr>().is_err() {
            return invalid("server.host must be an IP address");
        }
        if self.storage.bucket.trim().is_empty() {
            return invalid("storage.bucket must not be empty");
        }
        if self.storage.image_placeholder.trim().is_empty()
            || self.storage.video_placeholder.trim().is_empty()
        {
            return invalid("storage placeholders must name an object path");
        }
        if self.signing.url_ttl_seconds == 0 {
            return invalid("signing.url_ttl_seconds must be greater than zero");
        }
        if self.video_intelligence.poll_interval_ms == 0 {
            return invalid("video_intelligence.poll_interval_ms must be greater than zero");
        }
        if self.handlers.image.max_instances == 0 || self.handlers.video.max_instances == 0 {
            return invalid("handlers max_instances must be greater than zero");
        }

        if self.mode == RuntimeMode::Production {
            if self.stream.account_id.is_empty() || self.stream.api_token.is_empty() {
                return invalid("stream.account_id and stream.api_token are required in production");
            }
            if self.signing.secret_key == DEVELOPMENT_SIGNING_SECRET {
                return invalid("signing.secret_key must be set in production");
            }
        }

        Ok(())
    }
}

impl ServerConfig {
    /// Get the socket address for binding
    ///
    /// # Panics
    /// Panics if the host/port pair was not checked by [`AppConfig::validate`]
    #[must_use]
    pub fn socket_addr(&self) -> SocketAddr {
        format!("{}:{}", self.host, self.port).parse().expect("Invalid host/port configuration")
    }
}

impl StorageConfig {
    pub fn base_path(&self) -> PathBuf {
        PathBuf::from(&self.base_path)
    }

    pub fn temp_path(&self) -> PathBuf {
        PathBuf::from(&self.temp_path)
    }
}

impl SigningConfig {
    pub fn url_ttl(&self) -> Duration {
        Duration::from_secs(self.url_ttl_seconds)
    }
}

impl VideoIntelligenceConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl HandlerLimits {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl LoggingConfig {
    /// Directive used when `RUST_LOG` is not set
    pub fn default_directive(&self) -> String {
        self.filter.clone().unwrap_or_else(|| {
            format!("upload_moderation_service={0},tower_http={0}", self.level)
        })
    }
}
