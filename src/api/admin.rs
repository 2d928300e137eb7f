//! Admin pages and dashboard
//!
//! - GET /admin, /admin/, /admin/{*page} - Static page shells from `admin.pages_path`
//! - GET /api/cms/dashboard - Collection counts

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::path::PathBuf;

use crate::api::middleware::{ApiError, AppState};

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub shortlets: i64,
    pub tours: i64,
    pub media: i64,
    pub active_shortlets: i64,
    pub active_tours: i64,
}

/// Page shells; mounted behind `admin_page_gate`
pub fn pages_router() -> Router<AppState> {
    Router::new()
        .route("/admin", get(serve_dashboard_page))
        .route("/admin/", get(serve_dashboard_page))
        .route("/admin/{*page}", get(serve_page))
}

pub fn cms_router() -> Router<AppState> {
    Router::new().route("/", get(get_dashboard))
}

/// GET /api/cms/dashboard
async fn get_dashboard(State(state): State<AppState>) -> Result<Json<DashboardResponse>, ApiError> {
    Ok(Json(DashboardResponse {
        shortlets: state.shortlet_service.count().await?,
        tours: state.tour_service.count().await?,
        media: state.media_service.count().await?,
        active_shortlets: state.shortlet_service.count_published().await?,
        active_tours: state.tour_service.count_published().await?,
    }))
}

async fn serve_dashboard_page(State(state): State<AppState>) -> Response {
    render_page(&state, "dashboard").await
}

/// GET /admin/{*page}
async fn serve_page(State(state): State<AppState>, Path(page): Path<String>) -> Response {
    render_page(&state, page.trim_end_matches('/')).await
}

async fn render_page(state: &AppState, page: &str) -> Response {
    let Some(path) = page_file(&state.admin_config.pages_path, page) else {
        return page_not_found(page);
    };

    match tokio::fs::read_to_string(&path).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::debug!("Admin page {:?} unavailable: {}", path, e);
            page_not_found(page)
        }
    }
}

fn page_not_found(page: &str) -> Response {
    ApiError::not_found(format!("Admin page not found: {}", page)).into_response()
}

/// `shortlets/new` maps to `<root>/shortlets/new.html`; anything but
/// lower-case word segments is refused.
fn page_file(root: &std::path::Path, page: &str) -> Option<PathBuf> {
    if page.is_empty() {
        return None;
    }

    let mut path = root.to_path_buf();
    for segment in page.split('/') {
        let valid = !segment.is_empty()
            && segment
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
        if !valid {
            return None;
        }
        path.push(segment);
    }
    path.set_extension("html");
    Some(path)
}
