//! Middleware for authentication and request logging

pub mod auth;
pub mod logging;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};

/// Standard error body for middleware rejections
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiddlewareError {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
}

impl MiddlewareError {
    /// Create a new middleware error
    pub fn new(error: &str, code: &str) -> Self {
        Self {
            error: error.to_string(),
            code: code.to_string(),
        }
    }

    /// HTTP status implied by the error code
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self.code.as_str() {
            "MISSING_TOKEN" | "INVALID_AUTH_HEADER" | "INVALID_TOKEN" => StatusCode::UNAUTHORIZED,
            "FORBIDDEN" => StatusCode::FORBIDDEN,
            "INVALID_REQUEST" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Convert middleware error to HTTP response
impl From<MiddlewareError> for (StatusCode, Json<MiddlewareError>) {
    fn from(error: MiddlewareError) -> Self {
        (error.status(), Json(error))
    }
}

impl IntoResponse for MiddlewareError {
    fn into_response(self) -> Response {
        <(StatusCode, Json<Self>)>::from(self).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("MISSING_TOKEN", StatusCode::UNAUTHORIZED)]
    #[case("INVALID_AUTH_HEADER", StatusCode::UNAUTHORIZED)]
    #[case("INVALID_TOKEN", StatusCode::UNAUTHORIZED)]
    #[case("FORBIDDEN", StatusCode::FORBIDDEN)]
    #[case("SOMETHING_ELSE", StatusCode::INTERNAL_SERVER_ERROR)]
    fn test_status_mapping(#[case] code: &str, #[case] expected: StatusCode) {
        let (status, _) = MiddlewareError::new("x", code).into();
        assert_eq!(status, expected);
    }
}
