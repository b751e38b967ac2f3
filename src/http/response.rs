//! Response bodies and the HTTP error mapping.
//!
//! Every error leaves the gateway as
//! `{success: false, error, message, details?}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::upstream::UpstreamError;

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: String,
    pub timestamp: String,
}

/// Body of a successful `GET /api/rates`.
#[derive(Debug, Clone, Serialize)]
pub struct RatesResponse {
    pub success: bool,
    pub data: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Errors a handler can answer with.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Client sent something unusable.
    #[error("{error}: {message}")]
    BadRequest { error: String, message: String },

    /// Upstream could not be reached or answered badly.
    #[error("External API error: {0}")]
    Upstream(UpstreamError),

    /// Anything else, with details for the caller.
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Failure with nothing useful to report (e.g. a handler panic).
    #[error("Internal server error")]
    Unhandled,

    /// Request body exceeded `limits.max_body_bytes`.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Not found")]
    NotFound,

    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl ApiError {
    pub fn bad_request(error: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            error: error.into(),
            message: message.into(),
        }
    }

    pub fn missing_base() -> Self {
        Self::bad_request(
            "Missing required parameter: base",
            "Base currency code is required (USD, CAD, EUR, etc.)",
        )
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Upstream(_) | ApiError::Internal(_) | ApiError::Unhandled => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn body(&self) -> ErrorBody {
        let (error, message, details) = match self {
            ApiError::BadRequest { error, message } => (error.clone(), message.clone(), None),
            ApiError::Upstream(e) => (
                "External API error".to_string(),
                "Failed to fetch data from Frankfurt API".to_string(),
                Some(e.to_string()),
            ),
            ApiError::Internal(details) => (
                "Internal server error".to_string(),
                "An unexpected error occurred".to_string(),
                Some(details.clone()),
            ),
            ApiError::Unhandled => (
                "Internal server error".to_string(),
                "An unexpected error occurred".to_string(),
                None,
            ),
            ApiError::PayloadTooLarge(details) => (
                "Payload too large".to_string(),
                "Request body exceeds the configured size limit".to_string(),
                Some(details.clone()),
            ),
            ApiError::NotFound => (
                "Not found".to_string(),
                "The requested endpoint does not exist".to_string(),
                None,
            ),
            ApiError::MethodNotAllowed => (
                "Method not allowed".to_string(),
                "The HTTP method is not allowed for this endpoint".to_string(),
                None,
            ),
        };

        ErrorBody {
            success: false,
            error,
            message,
            details,
        }
    }
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::InvalidUrl(_) | UpstreamError::Client(_) => {
                ApiError::Internal(err.to_string())
            }
            other => ApiError::Upstream(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::BadRequest { .. } | ApiError::PayloadTooLarge(_) => {
                tracing::info!(error = %self, "Rejected request")
            }
            ApiError::NotFound | ApiError::MethodNotAllowed => {
                tracing::debug!(error = %self, "Unroutable request")
            }
            ApiError::Upstream(_) => tracing::error!(error = %self, "External API error"),
            ApiError::Internal(_) | ApiError::Unhandled => {
                tracing::error!(error = %self, "Unexpected error")
            }
        }

        (self.status(), Json(self.body())).into_response()
    }
}
