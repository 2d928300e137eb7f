//! Shortlet API endpoints
//!
//! Public:
//! - GET /api/shortlets - Active shortlets
//! - GET /api/shortlets/{slug} - One active shortlet
//!
//! CMS:
//! - GET/POST /api/cms/shortlets
//! - GET/PUT/DELETE /api/cms/shortlets/{id}
//! - POST /api/cms/shortlets/form - Create from the editor form

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::api::middleware::{ApiError, ApiJson, ApiPath, AppState};
use crate::forms::ShortletForm;
use crate::models::{CreateShortletInput, Shortlet, UpdateShortletInput};

#[derive(Debug, Serialize)]
pub struct ShortletListResponse {
    pub shortlets: Vec<Shortlet>,
}

pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_published))
        .route("/{slug}", get(get_published))
}

pub fn cms_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_all).post(create))
        .route("/form", post(create_from_form))
        .route("/{id}", get(get_by_id).put(update).delete(delete))
}

/// GET /api/shortlets
async fn list_published(State(state): State<AppState>) -> Result<Json<ShortletListResponse>, ApiError> {
    let shortlets = state.shortlet_service.list_published().await?;
    Ok(Json(ShortletListResponse { shortlets }))
}

/// GET /api/shortlets/{slug}
async fn get_published(
    State(state): State<AppState>,
    ApiPath(slug): ApiPath<String>,
) -> Result<Json<Shortlet>, ApiError> {
    Ok(Json(state.shortlet_service.get_published_by_slug(&slug).await?))
}

/// GET /api/cms/shortlets - every status, insertion order
async fn list_all(State(state): State<AppState>) -> Result<Json<Vec<Shortlet>>, ApiError> {
    Ok(Json(state.shortlet_service.list().await?))
}

/// POST /api/cms/shortlets
async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateShortletInput>,
) -> Result<(StatusCode, Json<Shortlet>), ApiError> {
    let created = state.shortlet_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// POST /api/cms/shortlets/form
async fn create_from_form(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<ShortletForm>,
) -> Result<(StatusCode, Json<Shortlet>), ApiError> {
    let input = form.validate()?;
    let created = state.shortlet_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/cms/shortlets/{id}
async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Shortlet>, ApiError> {
    Ok(Json(state.shortlet_service.get(id).await?))
}

/// PUT /api/cms/shortlets/{id}
async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<UpdateShortletInput>,
) -> Result<Json<Shortlet>, ApiError> {
    Ok(Json(state.shortlet_service.update(id, input).await?))
}

/// DELETE /api/cms/shortlets/{id}
async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    state.shortlet_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
