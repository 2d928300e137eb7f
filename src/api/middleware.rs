//! API middleware and shared handler types
//!
//! - `AppState`: services shared by every handler
//! - `ApiError`: the `{ "error", "code" }` body every failure is rendered as
//! - `ApiJson` / `ApiPath`: extractors that reject with an `ApiError`
//! - `require_token`: 401 gate in front of `/api/cms/*`
//! - `admin_page_gate`: redirect gate in front of `/admin/*` pages

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        FromRequest, FromRequestParts, Path, Request, State,
    },
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::cache::create_cache;
use crate::config::{AdminConfig, Config};
use crate::db::repositories::{
    SqlxMediaRepository, SqlxSettingsRepository, SqlxShortletRepository, SqlxTourRepository,
};
use crate::db::DynDatabasePool;
use crate::services::{
    ContactService, ContentError, LocalBlobStore, MediaService, PresenceVerifier, SessionError,
    SessionGate, SessionState, SettingsService, ShortletService, TourService, SESSION_COOKIE,
};

/// Login page path, the one `/admin` page reachable without a token
pub const ADMIN_LOGIN_PATH: &str = "/admin/login";

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub pool: DynDatabasePool,
    pub shortlet_service: Arc<ShortletService>,
    pub tour_service: Arc<TourService>,
    pub media_service: Arc<MediaService>,
    pub settings_service: Arc<SettingsService>,
    pub contact_service: ContactService,
    pub session_gate: Arc<SessionGate>,
    pub admin_config: Arc<AdminConfig>,
}

impl AppState {
    /// Wire every service against `pool` using the given configuration
    pub fn new(pool: DynDatabasePool, config: &Config) -> Self {
        let cache = create_cache(&config.cache);

        let shortlet_service = ShortletService::new(
            SqlxShortletRepository::boxed(pool.clone()),
            cache.clone(),
        );
        let tour_service = TourService::new(SqlxTourRepository::boxed(pool.clone()), cache.clone());
        let settings_service =
            SettingsService::new(SqlxSettingsRepository::boxed(pool.clone()), cache);
        let media_service = MediaService::new(
            SqlxMediaRepository::boxed(pool.clone()),
            Arc::new(LocalBlobStore::new(config.upload.path.clone())),
            config.upload.clone(),
        );
        let session_gate = SessionGate::new(Arc::new(PresenceVerifier), config.auth.clone());

        Self {
            pool,
            shortlet_service: Arc::new(shortlet_service),
            tour_service: Arc::new(tour_service),
            media_service: Arc::new(media_service),
            settings_service: Arc::new(settings_service),
            contact_service: ContactService::new(),
            session_gate: Arc::new(session_gate),
            admin_config: Arc::new(config.admin.clone()),
        }
    }
}

/// Error response for API errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: code.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new("UNAUTHORIZED", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.code.as_str() {
            "UNAUTHORIZED" => StatusCode::UNAUTHORIZED,
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "VALIDATION_ERROR" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(self)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation_error(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::validation_error(rejection.body_text())
    }
}

/// `Json` extractor whose rejections render as [`ApiError`]
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// `Path` extractor whose rejections render as [`ApiError`]
#[derive(Debug, FromRequestParts)]
#[from_request(via(Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

impl From<ContentError> for ApiError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::Validation(msg) => Self::validation_error(msg),
            ContentError::NotFound(msg) => Self::not_found(msg),
            ContentError::Internal(e) => {
                tracing::error!("Storage failure: {:#}", e);
                Self::internal_error("Something went wrong. Please try again.")
            }
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotConfigured | SessionError::InvalidCredentials => {
                Self::unauthorized(err.to_string())
            }
            SessionError::Internal(e) => {
                tracing::error!("Login failed: {:#}", e);
                Self::internal_error("Login failed")
            }
        }
    }
}

/// Token from `Authorization: Bearer` or, failing that, the admin cookie
pub(crate) fn extract_session_token(request: &Request) -> Option<String> {
    if let Some(auth_header) = request.headers().get(header::AUTHORIZATION) {
        if let Ok(auth_str) = auth_header.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                return Some(token.trim().to_string());
            }
        }
    }

    let cookie_prefix = format!("{}=", SESSION_COOKIE);
    for cookie_header in request.headers().get_all(header::COOKIE) {
        if let Ok(cookie_str) = cookie_header.to_str() {
            for cookie in cookie_str.split(';') {
                if let Some(token) = cookie.trim().strip_prefix(&cookie_prefix) {
                    return Some(token.to_string());
                }
            }
        }
    }

    None
}

async fn session_state(state: &AppState, token: Option<String>) -> SessionState {
    state.session_gate.resolve(token.as_deref()).await
}

/// CMS API gate: anonymous requests get a 401 and never reach a handler
pub async fn require_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_session_token(&request);
    if session_state(&state, token).await == SessionState::Anonymous {
        return Err(ApiError::unauthorized("Authentication required"));
    }
    Ok(next.run(request).await)
}

/// Admin page gate: anonymous visitors are sent to the login page
pub async fn admin_page_gate(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let is_login_page = request.uri().path().trim_end_matches('/') == ADMIN_LOGIN_PATH;
    if is_login_page {
        return next.run(request).await;
    }

    let token = extract_session_token(&request);
    match session_state(&state, token).await {
        SessionState::Authenticated => next.run(request).await,
        SessionState::Anonymous => Redirect::to(ADMIN_LOGIN_PATH).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request_with(name: header::HeaderName, value: &str) -> Request {
        Request::builder()
            .uri("/test")
            .header(name, value)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn test_extract_session_token_from_bearer() {
        let request = request_with(header::AUTHORIZATION, "Bearer test-token-123");
        assert_eq!(extract_session_token(&request), Some("test-token-123".to_string()));
    }

    #[test]
    fn test_extract_session_token_from_cookie() {
        let request = request_with(header::COOKIE, "theme=dark; admin_token=cookie-token");
        assert_eq!(extract_session_token(&request), Some("cookie-token".to_string()));
    }

    #[test]
    fn test_extract_session_token_ignores_other_cookies() {
        let request = request_with(header::COOKIE, "session=abc; not_admin_token=x");
        assert!(extract_session_token(&request).is_none());
    }

    #[test]
    fn test_extract_session_token_bearer_priority() {
        let request = Request::builder()
            .uri("/test")
            .header(header::AUTHORIZATION, "Bearer bearer-token")
            .header(header::COOKIE, "admin_token=cookie-token")
            .body(Body::empty())
            .unwrap();
        assert_eq!(extract_session_token(&request), Some("bearer-token".to_string()));
    }

    #[test]
    fn test_extract_session_token_none() {
        let request = Request::builder().uri("/test").body(Body::empty()).unwrap();
        assert!(extract_session_token(&request).is_none());
    }

    #[test]
    fn test_content_error_status_mapping() {
        let cases = [
            (ContentError::validation("Title is required"), StatusCode::BAD_REQUEST),
            (ContentError::not_found("Tour not found: 3"), StatusCode::NOT_FOUND),
            (
                ContentError::Internal(anyhow::anyhow!("disk I/O error")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn test_internal_detail_is_not_exposed() {
        let err = ApiError::from(ContentError::Internal(anyhow::anyhow!("table shortlets is locked")));
        assert!(!err.error.contains("locked"));
        assert_eq!(err.code, "INTERNAL_ERROR");
    }
}
