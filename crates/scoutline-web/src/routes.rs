//! Route definitions for the web server

use crate::{seo, state::WebState};
use axum::{Router, routing::get};
use std::sync::Arc;

/// Build the web server router
pub fn build_routes() -> Router<Arc<WebState>> {
    Router::new()
        .route("/api/seo", get(seo::get_seo))
        .route("/health", get(health_check))
}

/// Liveness probe
pub async fn health_check() -> &'static str {
    "OK"
}
