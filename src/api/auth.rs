//! Admin authentication endpoints
//!
//! - POST /api/admin/login - Check credentials, issue a token and cookie
//! - POST /api/admin/logout - Clear the admin cookie

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, ApiJson, AppState};
use crate::services::SESSION_COOKIE;

/// Cookie lifetime in seconds (7 days)
const SESSION_MAX_AGE: u64 = 7 * 24 * 60 * 60;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
}

/// POST /api/admin/login
async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if body.email.trim().is_empty() || body.password.is_empty() {
        return Err(ApiError::validation_error("Email and password are required"));
    }

    let token = state.session_gate.login(&body.email, &body.password)?;

    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, token, SESSION_MAX_AGE
    );
    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie)
            .map_err(|e| ApiError::internal_error(format!("Invalid cookie: {}", e)))?,
    );

    Ok((headers, Json(LoginResponse { token })))
}

/// POST /api/admin/logout
async fn logout() -> impl IntoResponse {
    let clear_cookie = format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        SESSION_COOKIE
    );
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&clear_cookie) {
        headers.insert(header::SET_COOKIE, value);
    }
    (StatusCode::NO_CONTENT, headers)
}
