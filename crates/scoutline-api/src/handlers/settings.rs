//! Site settings endpoints

use super::{ApiResult, store_error};
use crate::{extractors::ValidatedJson, state::AppState};
use axum::{extract::State, response::Json};
use scoutline_core::Settings;
use std::sync::Arc;
use tracing::info;

/// `GET /settings`
pub async fn get_settings(State(state): State<Arc<AppState>>) -> ApiResult<Json<Settings>> {
    state
        .repo
        .get_settings()
        .await
        .map(Json)
        .map_err(|e| store_error("load settings", e))
}

/// `PUT /settings`
pub async fn put_settings(
    State(state): State<Arc<AppState>>,
    ValidatedJson(settings): ValidatedJson<Settings>,
) -> ApiResult<Json<Settings>> {
    let saved = state
        .repo
        .put_settings(settings)
        .await
        .map_err(|e| store_error("save settings", e))?;

    info!(site_name = %saved.site_name, "Settings updated");
    Ok(Json(saved))
}
