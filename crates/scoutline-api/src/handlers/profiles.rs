//! Player and coach profile endpoints
//!
//! `/coaches` routes reuse these handlers with the kind pinned to
//! [`ProfileKind::Coach`]; a player id requested through `/coaches/:id` is a 404.

use super::{ApiResult, ListResponse, media::discard_file, not_found, store_error};
use crate::{
    extractors::{ExtractorError, ListQuery, ValidatedJson},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use scoutline_core::{NewProfile, Profile, ProfileKind, ProfileUpdate};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

const fn label(kind: Option<ProfileKind>) -> &'static str {
    match kind {
        Some(ProfileKind::Coach) => "Coach",
        _ => "Profile",
    }
}

async fn find_scoped(
    state: &AppState,
    id: Uuid,
    kind: Option<ProfileKind>,
) -> ApiResult<Profile> {
    let profile = state
        .repo
        .get_profile(id)
        .await
        .map_err(|e| store_error("load profile", e))?;

    profile
        .filter(|p| kind.is_none_or(|kind| p.kind == kind))
        .ok_or_else(|| not_found(label(kind)))
}

async fn list_scoped(
    state: &AppState,
    query: &ListQuery,
    kind: Option<ProfileKind>,
) -> ApiResult<Json<ListResponse<Profile>>> {
    let (filter, pagination) = query
        .profile_filter(&state.config.api, kind)
        .map_err(ExtractorError::into_api_error)?;

    let page = state
        .repo
        .list_profiles(&filter)
        .await
        .map_err(|e| store_error("list profiles", e))?;

    Ok(Json(ListResponse {
        data: page.items,
        pagination: pagination.meta(page.total),
    }))
}

async fn create_scoped(
    state: &AppState,
    mut new: NewProfile,
    kind: Option<ProfileKind>,
) -> ApiResult<(StatusCode, Json<Profile>)> {
    if let Some(kind) = kind {
        new.kind = kind;
    }

    let profile = state
        .repo
        .insert_profile(Profile::from_new(new))
        .await
        .map_err(|e| store_error("create profile", e))?;

    info!(id = %profile.id, kind = %profile.kind, "Profile created");
    Ok((StatusCode::CREATED, Json(profile)))
}

async fn update_scoped(
    state: &AppState,
    id: Uuid,
    update: ProfileUpdate,
    kind: Option<ProfileKind>,
) -> ApiResult<Json<Profile>> {
    find_scoped(state, id, kind).await?;

    state
        .repo
        .update_profile(id, update)
        .await
        .map_err(|e| store_error("update profile", e))?
        .map(Json)
        .ok_or_else(|| not_found(label(kind)))
}

async fn delete_scoped(
    state: &AppState,
    id: Uuid,
    kind: Option<ProfileKind>,
) -> ApiResult<StatusCode> {
    let profile = find_scoped(state, id, kind).await?;

    let removed = state
        .repo
        .delete_profile(id)
        .await
        .map_err(|e| store_error("delete profile", e))?;

    if removed {
        for attachment in &profile.media {
            discard_file(&state.media_dir.join(&attachment.path)).await;
        }
        info!(%id, media = profile.media.len(), "Profile deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(label(kind)))
    }
}

/// `GET /profiles`
#[instrument(skip(state))]
pub async fn list_profiles(
    State(state): State<Arc<AppState>>,
    query: ListQuery,
) -> ApiResult<Json<ListResponse<Profile>>> {
    list_scoped(&state, &query, None).await
}

/// `POST /profiles`
pub async fn create_profile(
    State(state): State<Arc<AppState>>,
    ValidatedJson(new): ValidatedJson<NewProfile>,
) -> ApiResult<(StatusCode, Json<Profile>)> {
    create_scoped(&state, new, None).await
}

/// `GET /profiles/:id`
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Profile>> {
    find_scoped(&state, id, None).await.map(Json)
}

/// `PUT /profiles/:id`
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    ValidatedJson(update): ValidatedJson<ProfileUpdate>,
) -> ApiResult<Json<Profile>> {
    update_scoped(&state, id, update, None).await
}

/// `DELETE /profiles/:id`
pub async fn delete_profile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    delete_scoped(&state, id, None).await
}

/// `GET /coaches`
#[instrument(skip(state))]
pub async fn list_coaches(
    State(state): State<Arc<AppState>>,
    query: ListQuery,
) -> ApiResult<Json<ListResponse<Profile>>> {
    list_scoped(&state, &query, Some(ProfileKind::Coach)).await
}

/// `POST /coaches`
pub async fn create_coach(
    State(state): State<Arc<AppState>>,
    ValidatedJson(new): ValidatedJson<NewProfile>,
) -> ApiResult<(StatusCode, Json<Profile>)> {
    create_scoped(&state, new, Some(ProfileKind::Coach)).await
}

/// `GET /coaches/:id`
pub async fn get_coach(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Profile>> {
    find_scoped(&state, id, Some(ProfileKind::Coach)).await.map(Json)
}

/// `PUT /coaches/:id`
pub async fn update_coach(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    ValidatedJson(update): ValidatedJson<ProfileUpdate>,
) -> ApiResult<Json<Profile>> {
    update_scoped(&state, id, update, Some(ProfileKind::Coach)).await
}

/// `DELETE /coaches/:id`
pub async fn delete_coach(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    delete_scoped(&state, id, Some(ProfileKind::Coach)).await
}
