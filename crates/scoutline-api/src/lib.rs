//! Scoutline API server library
//!
//! REST backend for player and coach profiles, orders and site settings,
//! mounted under `/api/v1`. Write endpoints require an admin bearer token.

#![forbid(unsafe_code)]

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use state::AppState;

use axum::Router;
use scoutline_core::Config;
use scoutline_core::context_error::Result;
use scoutline_database::Repository;
use std::sync::Arc;

/// Build the API router with all routes and middleware
///
/// # Errors
///
/// Returns an error if the media directory cannot be created or the
/// application state validation fails.
pub fn build_router(config: Config, repo: Arc<dyn Repository>) -> Result<Router> {
    let state = Arc::new(AppState::new(config, repo)?);
    state.validate()?;

    Ok(routes::build_router(state))
}
