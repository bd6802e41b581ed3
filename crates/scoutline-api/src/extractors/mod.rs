//! Custom extractors for request processing

pub mod pagination;
pub mod validated_json;

pub use pagination::{ListQuery, Pagination, PaginationMeta};
pub use validated_json::ValidatedJson;

use crate::handlers::{ApiError, ErrorResponse};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

/// Custom error type for extractors
#[derive(Debug)]
pub struct ExtractorError {
    /// Error message
    pub message: String,
    /// HTTP status code
    pub status: StatusCode,
    /// Error code for API responses
    pub code: String,
    /// Structured context, e.g. per-field validation errors
    pub details: Option<serde_json::Value>,
}

impl ExtractorError {
    /// Create a new extractor error
    pub fn new(message: impl Into<String>, status: StatusCode, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status,
            code: code.into(),
            details: None,
        }
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(message, StatusCode::BAD_REQUEST, "BAD_REQUEST")
    }

    /// Create an invalid query parameter error
    pub fn invalid_parameters(message: impl Into<String>) -> Self {
        Self::new(message, StatusCode::BAD_REQUEST, "INVALID_PARAMETERS")
    }

    /// Create a validation error carrying per-field details
    pub fn validation_failed(errors: &validator::ValidationErrors) -> Self {
        Self {
            details: Some(serde_json::json!(errors)),
            ..Self::new("Validation failed", StatusCode::BAD_REQUEST, "VALIDATION_FAILED")
        }
    }
}

impl fmt::Display for ExtractorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ExtractorError {}

impl ExtractorError {
    /// Convert into the handler error shape
    #[must_use]
    pub fn into_api_error(self) -> ApiError {
        let response = ErrorResponse {
            error: self.message,
            code: self.code,
            details: self.details,
        };
        (self.status, Json(response))
    }
}

impl IntoResponse for ExtractorError {
    fn into_response(self) -> Response {
        self.into_api_error().into_response()
    }
}
