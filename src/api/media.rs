//! Media library API endpoints
//!
//! - GET /api/cms/media?q= - List, or search by original name / alt text
//! - POST /api/cms/media - Multipart upload: `files` (one or more) + `uploadedBy`
//! - GET/PUT/DELETE /api/cms/media/{id} - PUT edits `altText` only

use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::api::middleware::{ApiError, ApiJson, ApiPath, AppState};
use crate::models::{Media, UpdateMediaInput};
use crate::services::{UploadFile, UploadOutcome};

#[derive(Debug, Deserialize)]
pub struct MediaListQuery {
    pub q: Option<String>,
}

/// `max_file_size` is enforced per file by the service; the body limit only
/// has to let a batch through.
pub fn cms_router(max_body_size: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(upload).layer(DefaultBodyLimit::max(max_body_size)))
        .route("/{id}", get(get_by_id).put(update).delete(delete))
}

/// GET /api/cms/media
async fn list(
    State(state): State<AppState>,
    Query(query): Query<MediaListQuery>,
) -> Result<Json<Vec<Media>>, ApiError> {
    Ok(Json(state.media_service.list(query.q.as_deref()).await?))
}

/// POST /api/cms/media
async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<UploadOutcome>), ApiError> {
    let mut multipart = multipart.map_err(|e| ApiError::validation_error(e.body_text()))?;
    let mut files = Vec::new();
    let mut uploaded_by: Option<i64> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation_error(format!("Failed to read multipart: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "files" | "file" => {
                let original_name = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                let mime_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::validation_error(format!("Failed to read file: {}", e)))?;

                files.push(UploadFile {
                    original_name,
                    mime_type,
                    data: data.to_vec(),
                });
            }
            "uploadedBy" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::validation_error(format!("Failed to read field: {}", e)))?;
                let id = text
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| ApiError::validation_error("uploadedBy must be a user id"))?;
                uploaded_by = Some(id);
            }
            _ => continue,
        }
    }

    let uploaded_by = uploaded_by.ok_or_else(|| ApiError::validation_error("uploadedBy is required"))?;
    let outcome = state.media_service.upload(files, uploaded_by).await?;

    if outcome.media.is_empty() {
        return Err(ApiError::validation_error(outcome.failed.join("; ")));
    }
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// GET /api/cms/media/{id}
async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Media>, ApiError> {
    Ok(Json(state.media_service.get(id).await?))
}

/// PUT /api/cms/media/{id}
async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<UpdateMediaInput>,
) -> Result<Json<Media>, ApiError> {
    Ok(Json(state.media_service.update(id, input).await?))
}

/// DELETE /api/cms/media/{id}
async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    state.media_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
