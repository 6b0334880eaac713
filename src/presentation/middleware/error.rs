use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;

use crate::domain::services::{ClassifierError, TranscodeError};
use crate::infrastructure::storage::{SignedUrlError, StorageError};

/// Application error types that can be converted to HTTP responses
///
/// A 5xx response tells the event source the invocation failed and should be
/// retried; nothing in this service retries on its own.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Resource no longer available: {message}")]
    Gone { message: String },

    #[error("Invalid request: {message}")]
    BadRequest { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("External service error: {service}: {message}")]
    ExternalService { service: String, message: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl AppError {
    pub fn classifier(service: &str, err: &ClassifierError) -> Self {
        AppError::ExternalService { service: service.to_string(), message: err.to_string() }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Authentication { .. } => StatusCode::UNAUTHORIZED,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Gone { .. } => StatusCode::GONE,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Storage { .. } | AppError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::ExternalService { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    /// Get the error type for logging
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Authentication { .. } => "authentication",
            AppError::NotFound { .. } => "not_found",
            AppError::Gone { .. } => "gone",
            AppError::BadRequest { .. } => "bad_request",
            AppError::Storage { .. } => "storage",
            AppError::ExternalService { .. } => "external_service",
            AppError::Internal { .. } => "internal",
        }
    }

    /// Check if this error should be logged as an error (vs warning)
    pub fn should_log_as_error(&self) -> bool {
        matches!(
            self,
            AppError::Storage { .. } | AppError::ExternalService { .. } | AppError::Internal { .. }
        )
    }

    /// Create error response with proper structure
    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: ErrorDetail {
                id: Uuid::new_v4().to_string(),
                error_type: self.error_type().to_string(),
                message: self.to_string(),
                details: self.get_details(),
                timestamp: chrono::Utc::now().to_rfc3339(),
            },
        }
    }

    fn get_details(&self) -> Option<Value> {
        match self {
            AppError::NotFound { resource } => Some(json!({ "resource": resource })),
            AppError::ExternalService { service, .. } => Some(json!({ "service": service })),
            _ => None,
        }
    }
}

/// Structured error response
#[derive(serde::Serialize, Debug)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(serde::Serialize, Debug)]
pub struct ErrorDetail {
    pub id: String,
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    pub timestamp: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_response = self.to_error_response();

        if self.should_log_as_error() {
            error!(
                error_type = self.error_type(),
                error_id = error_response.error.id,
                "Application error: {}",
                self
            );
        } else {
            warn!(
                error_type = self.error_type(),
                error_id = error_response.error.id,
                "Application warning: {}",
                self
            );
        }

        (status, Json(error_response)).into_response()
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::ObjectNotFound { path } => AppError::NotFound { resource: path },
            StorageError::InvalidPath { path } => {
                AppError::BadRequest { message: format!("Invalid object path: {path}") }
            }
            StorageError::IoError { .. } => AppError::Storage { message: err.to_string() },
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage { message: err.to_string() }
    }
}

impl From<TranscodeError> for AppError {
    fn from(err: TranscodeError) -> Self {
        AppError::ExternalService { service: "transcoder".to_string(), message: err.to_string() }
    }
}

impl From<SignedUrlError> for AppError {
    fn from(err: SignedUrlError) -> Self {
        match err {
            SignedUrlError::Expired { expired_at } => {
                AppError::Gone { message: format!("Signed URL expired at {expired_at}") }
            }
            SignedUrlError::InvalidSignature => {
                AppError::Authentication { message: "Invalid URL signature".to_string() }
            }
            SignedUrlError::InvalidExpiration => {
                AppError::BadRequest { message: "Invalid expiration time".to_string() }
            }
            SignedUrlError::SigningError => {
                AppError::Internal { message: "Failed to sign URL".to_string() }
            }
        }
    }
}
