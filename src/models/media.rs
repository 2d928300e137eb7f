//! Media library model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Uploaded file metadata. The binary lives in blob storage under `filename`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub id: i64,
    pub filename: String,
    pub original_name: String,
    pub mime_type: String,
    /// Size in bytes
    pub size: i64,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
    pub uploaded_by: i64,
    pub created_at: DateTime<Utc>,
}

/// Input for editing media metadata
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMediaInput {
    pub alt_text: Option<String>,
}
