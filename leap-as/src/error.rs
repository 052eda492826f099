//! Error types for leap-as

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::{GenerateError, TranscribeError};

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Upstream provider unreachable or misbehaving (502)
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Transcription job reached its terminal error state (502)
    #[error("Transcription failed: {0}")]
    TranscriptionFailed(String),

    /// Bounded wait on an asynchronous provider job expired (504)
    #[error("Timeout exceeded: {0}")]
    TimeoutExceeded(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),

    /// leap-common error
    #[error("Common error: {0}")]
    Common(#[from] leap_common::Error),
}

impl From<TranscribeError> for ApiError {
    fn from(err: TranscribeError) -> Self {
        match err {
            TranscribeError::JobFailed(detail) => ApiError::TranscriptionFailed(detail),
            timeout @ TranscribeError::Timeout { .. } => {
                ApiError::TimeoutExceeded(timeout.to_string())
            }
            other => ApiError::ProviderUnavailable(other.to_string()),
        }
    }
}

impl From<GenerateError> for ApiError {
    fn from(err: GenerateError) -> Self {
        ApiError::ProviderUnavailable(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::ProviderUnavailable(msg) => {
                (StatusCode::BAD_GATEWAY, "PROVIDER_UNAVAILABLE", msg)
            }
            ApiError::TranscriptionFailed(msg) => {
                (StatusCode::BAD_GATEWAY, "TRANSCRIPTION_FAILED", msg)
            }
            ApiError::TimeoutExceeded(msg) => {
                (StatusCode::GATEWAY_TIMEOUT, "TIMEOUT_EXCEEDED", msg)
            }
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
            ApiError::Other(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                err.to_string(),
            ),
            ApiError::Common(ref err) => match err {
                leap_common::Error::Database(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PERSISTENCE_FAILURE",
                    err.to_string(),
                ),
                leap_common::Error::NotFound(_) => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
                }
                leap_common::Error::InvalidInput(_) => {
                    (StatusCode::BAD_REQUEST, "BAD_REQUEST", err.to_string())
                }
                _ => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "COMMON_ERROR",
                    err.to_string(),
                ),
            },
        };

        let body = Json(json!({
            "ok": false,
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
