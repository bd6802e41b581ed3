//! Admin bearer-token gate for write endpoints

use crate::{middleware::MiddlewareError, state::AppState};
use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, warn};

const BEARER_PREFIX: &str = "Bearer ";

/// Reject the request with 401 unless it carries a known admin bearer token
///
/// The token is md5-hashed and compared with the configured admin token
/// hashes. The wrapped handler never runs for a rejected request.
pub async fn require_admin_token(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, MiddlewareError> {
    let token = extract_bearer_token(request.headers())?;

    if !state.is_admin_token(token) {
        warn!(
            method = %request.method(),
            path = %request.uri().path(),
            "Rejected request with unknown admin token"
        );
        return Err(MiddlewareError::new("Invalid token", "INVALID_TOKEN"));
    }

    debug!(path = %request.uri().path(), "Admin token accepted");
    Ok(next.run(request).await)
}

/// Extract the token from an `Authorization: Bearer <token>` header
fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, MiddlewareError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Err(MiddlewareError::new(
            "Authorization required. Provide Authorization: Bearer <token>",
            "MISSING_TOKEN",
        ));
    };

    value
        .to_str()
        .ok()
        .and_then(|header| header.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            MiddlewareError::new(
                "Invalid Authorization header format. Use 'Bearer <token>'",
                "INVALID_AUTH_HEADER",
            )
        })
}
