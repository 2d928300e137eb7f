//! Contact form endpoint
//!
//! - POST /api/contact

use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;

use crate::api::middleware::{ApiError, ApiJson, AppState};
use crate::services::ContactEnquiry;

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(submit))
}

async fn submit(
    State(state): State<AppState>,
    ApiJson(enquiry): ApiJson<ContactEnquiry>,
) -> Result<Json<ContactResponse>, ApiError> {
    let message = state.contact_service.submit(&enquiry)?;
    Ok(Json(ContactResponse {
        success: true,
        message: message.to_string(),
    }))
}
