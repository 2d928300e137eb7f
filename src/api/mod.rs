//! API layer - HTTP handlers and routing
//!
//! - `/api/*` public read endpoints, contact form and admin login
//! - `/api/cms/*` CMS endpoints behind the token gate
//! - `/admin/*` admin page shells behind the redirect gate
//! - `/uploads/*` stored media

pub mod admin;
pub mod auth;
pub mod contact;
pub mod media;
pub mod middleware;
pub mod settings;
pub mod shortlets;
pub mod tours;

use anyhow::Context;
use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::config::Config;

pub use middleware::{ApiError, AppState};

/// Largest upload batch, in files of the maximum size
const MAX_FILES_PER_BATCH: u64 = 10;

/// Build the `/api` router
pub fn build_api_router(state: AppState, max_upload_body: usize) -> Router<AppState> {
    let cms_routes = Router::new()
        .nest("/shortlets", shortlets::cms_router())
        .nest("/tours", tours::cms_router())
        .nest("/media", media::cms_router(max_upload_body))
        .nest("/settings", settings::cms_router())
        .nest("/dashboard", admin::cms_router())
        .route_layer(axum_middleware::from_fn_with_state(
            state,
            middleware::require_token,
        ));

    Router::new()
        .nest("/shortlets", shortlets::public_router())
        .nest("/tours", tours::public_router())
        .nest("/site", settings::public_router())
        .nest("/contact", contact::router())
        .nest("/admin", auth::router())
        .nest("/cms", cms_routes)
}

/// Build the complete router with middleware
pub fn build_router(state: AppState, config: &Config) -> anyhow::Result<Router> {
    let origin = config
        .server
        .cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS origin: {}", config.server.cors_origin))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::COOKIE])
        .allow_credentials(true);

    let max_upload_body: usize = config
        .upload
        .max_file_size
        .saturating_mul(MAX_FILES_PER_BATCH)
        .try_into()
        .unwrap_or(usize::MAX);

    let admin_pages = admin::pages_router().route_layer(axum_middleware::from_fn_with_state(
        state.clone(),
        middleware::admin_page_gate,
    ));

    Ok(Router::new()
        .nest("/api", build_api_router(state.clone(), max_upload_body))
        .merge(admin_pages)
        .nest_service("/uploads", ServeDir::new(&config.upload.path))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}
