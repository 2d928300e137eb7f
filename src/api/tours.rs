//! Tour API endpoints
//!
//! Public:
//! - GET /api/tours?category= - Active tours, optionally one category
//! - GET /api/tours/{slug} - One active tour
//!
//! CMS:
//! - GET/POST /api/cms/tours
//! - GET/PUT/DELETE /api/cms/tours/{id}
//! - POST /api/cms/tours/form - Create from the editor form

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, ApiJson, ApiPath, AppState};
use crate::forms::TourForm;
use crate::models::{CreateTourInput, Tour, UpdateTourInput};
use crate::services::validation::parse_category;

#[derive(Debug, Deserialize)]
pub struct TourListQuery {
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TourListResponse {
    pub tours: Vec<Tour>,
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

/// GET /api/tours
async fn list_published(
    State(state): State<AppState>,
    Query(query): Query<TourListQuery>,
) -> Result<Json<TourListResponse>, ApiError> {
    let category = query
        .category
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .map(parse_category)
        .transpose()?;

    let tours = state.tour_service.list_published(category).await?;
    Ok(Json(TourListResponse { tours }))
}

/// GET /api/tours/{slug}
async fn get_published(
    State(state): State<AppState>,
    ApiPath(slug): ApiPath<String>,
) -> Result<Json<Tour>, ApiError> {
    Ok(Json(state.tour_service.get_published_by_slug(&slug).await?))
}

/// GET /api/cms/tours
async fn list_all(State(state): State<AppState>) -> Result<Json<Vec<Tour>>, ApiError> {
    Ok(Json(state.tour_service.list().await?))
}

/// POST /api/cms/tours
async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateTourInput>,
) -> Result<(StatusCode, Json<Tour>), ApiError> {
    let created = state.tour_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// POST /api/cms/tours/form
async fn create_from_form(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<TourForm>,
) -> Result<(StatusCode, Json<Tour>), ApiError> {
    let input = form.validate()?;
    let created = state.tour_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/cms/tours/{id}
async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Tour>, ApiError> {
    Ok(Json(state.tour_service.get(id).await?))
}

/// PUT /api/cms/tours/{id}
async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<UpdateTourInput>,
) -> Result<Json<Tour>, ApiError> {
    Ok(Json(state.tour_service.update(id, input).await?))
}

/// DELETE /api/cms/tours/{id}
async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    state.tour_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
