//! Media repository

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

use crate::db::DynDatabasePool;
use crate::models::Media;

#[async_trait]
pub trait MediaRepository: Send + Sync {
    async fn create(&self, media: &Media) -> Result<Media>;
    async fn get_by_id(&self, id: i64) -> Result<Option<Media>>;
    /// All records in insertion order
    async fn list(&self) -> Result<Vec<Media>>;
    /// Case-insensitive match on stored filename, original name or alt text
    async fn search(&self, query: &str) -> Result<Vec<Media>>;
    async fn update_alt_text(&self, id: i64, alt_text: Option<&str>) -> Result<Option<Media>>;
    /// Returns `false` when no row had that id
    async fn delete(&self, id: i64) -> Result<bool>;
    async fn count(&self) -> Result<i64>;
}

pub struct SqlxMediaRepository {
    pool: DynDatabasePool,
}

impl SqlxMediaRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn MediaRepository> {
        Arc::new(Self::new(pool))
    }

    fn sqlite(&self) -> &SqlitePool {
        self.pool.sqlite()
    }
}

const SELECT_COLUMNS: &str =
    "SELECT id, filename, original_name, mime_type, size, url, alt_text, uploaded_by, created_at FROM media";

#[async_trait]
impl MediaRepository for SqlxMediaRepository {
    async fn create(&self, media: &Media) -> Result<Media> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO media (filename, original_name, mime_type, size, url, alt_text, uploaded_by, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&media.filename)
        .bind(&media.original_name)
        .bind(&media.mime_type)
        .bind(media.size)
        .bind(&media.url)
        .bind(&media.alt_text)
        .bind(media.uploaded_by)
        .bind(now)
        .execute(self.sqlite())
        .await
        .context("Failed to create media")?;

        Ok(Media {
            id: result.last_insert_rowid(),
            created_at: now,
            ..media.clone()
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Media>> {
        let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(id)
            .fetch_optional(self.sqlite())
            .await
            .context("Failed to get media")?;
        row.map(|r| row_to_media(&r)).transpose()
    }

    async fn list(&self) -> Result<Vec<Media>> {
        let rows = sqlx::query(&format!("{} ORDER BY id ASC", SELECT_COLUMNS))
            .fetch_all(self.sqlite())
            .await
            .context("Failed to list media")?;
        rows.iter().map(row_to_media).collect()
    }

    async fn search(&self, query: &str) -> Result<Vec<Media>> {
        let pattern = format!("%{}%", escape_like(&query.to_lowercase()));
        let rows = sqlx::query(&format!(
            "{} WHERE LOWER(filename) LIKE ?1 ESCAPE '\\' \
               OR LOWER(original_name) LIKE ?1 ESCAPE '\\' \
               OR LOWER(COALESCE(alt_text, '')) LIKE ?1 ESCAPE '\\' \
             ORDER BY id ASC",
            SELECT_COLUMNS
        ))
        .bind(&pattern)
        .fetch_all(self.sqlite())
        .await
        .context("Failed to search media")?;
        rows.iter().map(row_to_media).collect()
    }

    async fn update_alt_text(&self, id: i64, alt_text: Option<&str>) -> Result<Option<Media>> {
        let result = sqlx::query("UPDATE media SET alt_text = ? WHERE id = ?")
            .bind(alt_text)
            .bind(id)
            .execute(self.sqlite())
            .await
            .context("Failed to update media")?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM media WHERE id = ?")
            .bind(id)
            .execute(self.sqlite())
            .await
            .context("Failed to delete media")?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM media")
            .fetch_one(self.sqlite())
            .await?;
        Ok(row.get("count"))
    }
}

/// `%` and `_` in user input match themselves.
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn row_to_media(row: &sqlx::sqlite::SqliteRow) -> Result<Media> {
    Ok(Media {
        id: row.try_get("id")?,
        filename: row.try_get("filename")?,
        original_name: row.try_get("original_name")?,
        mime_type: row.try_get("mime_type")?,
        size: row.try_get("size")?,
        url: row.try_get("url")?,
        alt_text: row.try_get("alt_text")?,
        uploaded_by: row.try_get("uploaded_by")?,
        created_at: row.try_get("created_at")?,
    })
}
