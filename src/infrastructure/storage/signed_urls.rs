use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::Duration;

use crate::infrastructure::config::AppConfig;

type HmacSha256 = Hmac<Sha256>;

/// Route prefix the signed download handler is mounted under
pub const SIGNED_DOWNLOAD_PREFIX: &str = "/objects";

/// A time-limited read URL for one object
#[derive(Debug, Clone)]
pub struct SignedUrl {
    pub url: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies HMAC-signed read-only object URLs
#[derive(Clone)]
pub struct SignedUrlService {
    secret_key: String,
    base_url: String,
    default_ttl: Duration,
}

impl SignedUrlService {
    pub fn new(secret_key: impl Into<String>, base_url: impl Into<String>, ttl: Duration) -> Self {
        Self {
            secret_key: secret_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            default_ttl: ttl,
        }
    }

    /// Create from app configuration
    pub fn from_app_config(app_config: &AppConfig) -> Self {
        Self::new(
            app_config.signing.secret_key.clone(),
            app_config.server.public_base_url.clone(),
            app_config.signing.url_ttl(),
        )
    }

    /// Sign a read URL valid for the configured window starting now
    pub fn sign_read_url(&self, object_path: &str) -> Result<SignedUrl, SignedUrlError> {
        self.sign_read_url_at(object_path, Utc::now(), self.default_ttl)
    }

    /// Sign a read URL valid for `ttl` starting at `issued_at`
    pub fn sign_read_url_at(
        &self,
        object_path: &str,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<SignedUrl, SignedUrlError> {
        let expires_at = issued_at
            + chrono::Duration::from_std(ttl).map_err(|_| SignedUrlError::InvalidExpiration)?;
        let signature =
            self.sign_payload(&Self::signature_payload(object_path, expires_at.timestamp()))?;

        let encoded_path =
            object_path.split('/').map(urlencoding::encode).collect::<Vec<_>>().join("/");

        let url = format!(
            "{}{}/{}?expires={}&signature={}",
            self.base_url,
            SIGNED_DOWNLOAD_PREFIX,
            encoded_path,
            expires_at.timestamp(),
            signature
        );

        Ok(SignedUrl { url, expires_at })
    }

    /// Validate a signed URL's parameters for an object path
    pub fn verify(
        &self,
        object_path: &str,
        expires_timestamp: i64,
        signature: &str,
    ) -> Result<(), SignedUrlError> {
        let expires_at = DateTime::from_timestamp(expires_timestamp, 0)
            .ok_or(SignedUrlError::InvalidExpiration)?;

        let provided = hex::decode(signature).map_err(|_| SignedUrlError::InvalidSignature)?;

        let mut mac = self.mac()?;
        mac.update(Self::signature_payload(object_path, expires_timestamp).as_bytes());
        mac.verify_slice(&provided).map_err(|_| SignedUrlError::InvalidSignature)?;

        // Checked after the signature so a forged expiry never reports "expired"
        if Utc::now() > expires_at {
            return Err(SignedUrlError::Expired { expired_at: expires_at });
        }

        Ok(())
    }

    fn signature_payload(object_path: &str, expires_timestamp: i64) -> String {
        format!("{object_path}|{expires_timestamp}")
    }

    fn mac(&self) -> Result<HmacSha256, SignedUrlError> {
        HmacSha256::new_from_slice(self.secret_key.as_bytes())
            .map_err(|_| SignedUrlError::SigningError)
    }

    /// Generate HMAC signature for the payload
    fn sign_payload(&self, payload: &str) -> Result<String, SignedUrlError> {
        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

/// Errors that can occur during signed URL operations
#[derive(Debug, thiserror::Error)]
pub enum SignedUrlError {
    #[error("Signed URL has expired at {expired_at}")]
    Expired { expired_at: DateTime<Utc> },

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Invalid expiration time")]
    InvalidExpiration,

    #[error("Failed to sign payload")]
    SigningError,
}
