//! Web server setup

use crate::{api_client::ClientError, routes::build_routes, state::WebState};
use axum::Router;
use scoutline_core::Config;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the web application with routes, tracing and state
///
/// # Errors
///
/// Returns an error if the backend API client cannot be built.
pub fn build_app(config: Config) -> Result<Router, ClientError> {
    let state = Arc::new(WebState::new(config)?);

    Ok(build_routes()
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}
