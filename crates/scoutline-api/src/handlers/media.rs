//! Profile media upload

use super::{ApiError, ApiResult, api_error, not_found, store_error};
use crate::state::AppState;
use axum::{
    extract::{Multipart, Path, State, multipart::MultipartRejection},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use scoutline_core::{MediaAttachment, Profile};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Name of the multipart field carrying the file
pub const FILE_FIELD: &str = "file";

const MAX_FILENAME_LEN: usize = 100;

/// Reduce a client filename to `[A-Za-z0-9._-]`, without leading dots
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_FILENAME_LEN)
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

struct UploadedFile {
    filename: String,
    content_type: String,
    data: axum::body::Bytes,
}

async fn read_file_field(mut multipart: Multipart) -> ApiResult<UploadedFile> {
    loop {
        let field = multipart.next_field().await.map_err(|e| {
            warn!("Error parsing multipart data: {}", e);
            api_error(e.status(), format!("Invalid multipart data: {}", e.body_text()), "INVALID_MULTIPART")
        })?;
        let Some(field) = field else {
            return Err(api_error(
                StatusCode::BAD_REQUEST,
                format!("Missing '{FILE_FIELD}' field"),
                "MISSING_FILE",
            ));
        };

        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = sanitize_filename(field.file_name().unwrap_or_default());
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field.bytes().await.map_err(|e| {
            api_error(e.status(), format!("Failed to read upload: {}", e.body_text()), "INVALID_MULTIPART")
        })?;

        return Ok(UploadedFile {
            filename,
            content_type,
            data,
        });
    }
}

fn storage_failure(e: &std::io::Error) -> ApiError {
    error!("Failed to store media file: {}", e);
    api_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Failed to store media file",
        "STORAGE_ERROR",
    )
}

/// Remove a stored media file, logging instead of failing
pub(crate) async fn discard_file(path: &std::path::Path) {
    match tokio::fs::remove_file(path).await {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
            warn!("Failed to remove media file {}: {}", path.display(), e);
        }
        _ => {}
    }
}

/// Record a stored file on the profile; the file is removed if that fails
async fn attach_stored(
    state: &AppState,
    id: Uuid,
    attachment: MediaAttachment,
    file_path: &std::path::Path,
) -> ApiResult<Profile> {
    let attached = state
        .repo
        .add_media(id, attachment)
        .await
        .map_err(|e| store_error("attach media", e))
        .and_then(|profile| profile.ok_or_else(|| not_found("Profile")));

    if attached.is_err() {
        discard_file(file_path).await;
    }
    attached
}

/// `POST /profiles/:id/media`
///
/// Accepts `multipart/form-data` with a single `file` part. The file is
/// written under the media directory and appended to the profile's media list.
pub async fn upload_media(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<(StatusCode, Json<Profile>)> {
    let multipart = multipart.map_err(|e| {
        api_error(
            StatusCode::BAD_REQUEST,
            format!("Request must be multipart/form-data: {}", e.body_text()),
            "INVALID_CONTENT_TYPE",
        )
    })?;

    let exists = state
        .repo
        .get_profile(id)
        .await
        .map_err(|e| store_error("load profile", e))?
        .is_some();
    if !exists {
        return Err(not_found("Profile"));
    }

    let upload = read_file_field(multipart).await?;
    let size = upload.data.len() as u64;
    let storage = &state.config.storage;

    if size == 0 {
        return Err(api_error(StatusCode::BAD_REQUEST, "Uploaded file is empty", "EMPTY_FILE"));
    }
    if size > storage.max_file_size {
        return Err(api_error(
            StatusCode::PAYLOAD_TOO_LARGE,
            format!("File size {size} exceeds maximum {}", storage.max_file_size),
            "FILE_TOO_LARGE",
        ));
    }
    if !storage.accepts(&upload.content_type) {
        return Err(api_error(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            format!("Content type '{}' is not allowed", upload.content_type),
            "UNSUPPORTED_MEDIA_TYPE",
        ));
    }

    let now = Utc::now();
    let media_id = Uuid::new_v4();
    let directory = state.get_storage_path(now.date_naive());
    tokio::fs::create_dir_all(&directory)
        .await
        .map_err(|e| storage_failure(&e))?;

    let file_path = directory.join(format!("{media_id}_{}", upload.filename));
    tokio::fs::write(&file_path, &upload.data)
        .await
        .map_err(|e| storage_failure(&e))?;

    let relative = file_path
        .strip_prefix(&state.media_dir)
        .unwrap_or(&file_path)
        .to_string_lossy()
        .replace('\\', "/");

    let attachment = MediaAttachment {
        id: media_id,
        filename: upload.filename,
        content_type: upload.content_type,
        size_bytes: size,
        path: relative,
        uploaded_at: now,
    };

    let profile = attach_stored(&state, id, attachment, &file_path).await?;

    info!(profile = %id, media = %media_id, size, "Media uploaded");
    Ok((StatusCode::CREATED, Json(profile)))
}
