//! HTTP handlers and their shared response types

pub mod health;
pub mod media;
pub mod orders;
pub mod profiles;
pub mod settings;

use crate::extractors::PaginationMeta;
use axum::{Json, http::StatusCode};
use scoutline_core::Error;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

/// Error body returned by every endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Additional details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Handler error: status plus JSON body
pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Handler result
pub type ApiResult<T> = Result<T, ApiError>;

/// Paginated list body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    /// Rows on this page
    pub data: Vec<T>,
    /// Page window and totals
    pub pagination: PaginationMeta,
}

/// Build an error response
pub fn api_error(status: StatusCode, error: impl Into<String>, code: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.to_string(),
            details: None,
        }),
    )
}

/// 404 for a missing resource
pub fn not_found(resource: &str) -> ApiError {
    api_error(StatusCode::NOT_FOUND, format!("{resource} not found"), "NOT_FOUND")
}

/// Map a store error onto a response, logging server-side failures
pub fn store_error(action: &str, err: Error) -> ApiError {
    match err {
        Error::NotFound { resource } => {
            warn!("{action}: {resource} not found");
            api_error(StatusCode::NOT_FOUND, format!("{resource} not found"), "NOT_FOUND")
        }
        Error::Validation { field, message } => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Validation failed".to_string(),
                code: "VALIDATION_FAILED".to_string(),
                details: Some(serde_json::json!({ field: [{ "message": message }] })),
            }),
        ),
        other => {
            error!("{action} failed: {other}");
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to {action}"),
                "DATABASE_ERROR",
            )
        }
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_store_error_mapping() {
        let (status, _) = store_error("load profile", Error::not_found("Profile"));
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, Json(body)) =
            store_error("list profiles", Error::Database("connection reset".to_string()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Failed to list profiles");
        assert!(!body.error.contains("connection reset"));

        let (status, Json(body)) = store_error("create order", Error::validation("plan", "bad"));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, "VALIDATION_FAILED");
    }

    #[test]
    fn test_error_response_omits_empty_details() {
        let (_, Json(body)) = not_found("Order");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({"error": "Order not found", "code": "NOT_FOUND"}));
    }
}
