//! Database repositories
//!
//! One repository per collection of the content store. Services depend on
//! the traits; the `Sqlx*` types are the SQLite implementations.

pub mod media;
pub mod settings;
pub mod shortlet;
pub mod tour;

pub use media::{MediaRepository, SqlxMediaRepository};
pub use settings::{Setting, SettingsRepository, SqlxSettingsRepository};
pub use shortlet::{ShortletRepository, SqlxShortletRepository};
pub use tour::{SqlxTourRepository, TourRepository};

use anyhow::{Context, Result};

/// Ordered list fields are stored as JSON arrays in TEXT columns.
pub(crate) fn encode_list(items: &[String]) -> Result<String> {
    serde_json::to_string(items).context("Failed to encode list column")
}

pub(crate) fn decode_list(raw: &str) -> Result<Vec<String>> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(raw).context("Failed to decode list column")
}
