//! Site settings API endpoints
//!
//! - GET /api/site/settings - Public copy of the site settings
//! - GET/PUT /api/cms/settings - Read and replace the settings singleton

use axum::{extract::State, routing::get, Json, Router};

use crate::api::middleware::{ApiError, ApiJson, AppState};
use crate::services::SiteSettings;

pub fn public_router() -> Router<AppState> {
    Router::new().route("/settings", get(get_public_settings))
}

pub fn cms_router() -> Router<AppState> {
    Router::new().route("/", get(get_settings).put(update_settings))
}

/// GET /api/site/settings
async fn get_public_settings(State(state): State<AppState>) -> Result<Json<SiteSettings>, ApiError> {
    Ok(Json(state.settings_service.get_public_settings().await?))
}

/// GET /api/cms/settings
async fn get_settings(State(state): State<AppState>) -> Result<Json<SiteSettings>, ApiError> {
    Ok(Json(state.settings_service.get_site_settings().await?))
}

/// PUT /api/cms/settings
///
/// Fields left out of the body reset to their defaults.
async fn update_settings(
    State(state): State<AppState>,
    ApiJson(settings): ApiJson<SiteSettings>,
) -> Result<Json<SiteSettings>, ApiError> {
    Ok(Json(state.settings_service.update_site_settings(&settings).await?))
}
