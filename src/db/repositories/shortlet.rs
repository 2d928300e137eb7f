//! Shortlet repository

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

use super::{decode_list, encode_list};
use crate::db::DynDatabasePool;
use crate::models::{ContentStatus, Shortlet};

#[async_trait]
pub trait ShortletRepository: Send + Sync {
    async fn create(&self, shortlet: &Shortlet) -> Result<Shortlet>;
    async fn get_by_id(&self, id: i64) -> Result<Option<Shortlet>>;
    async fn get_by_slug(&self, slug: &str) -> Result<Option<Shortlet>>;
    /// All records in insertion order
    async fn list(&self) -> Result<Vec<Shortlet>>;
    async fn list_active(&self) -> Result<Vec<Shortlet>>;
    async fn update(&self, shortlet: &Shortlet) -> Result<Shortlet>;
    /// Returns `false` when no row had that id
    async fn delete(&self, id: i64) -> Result<bool>;
    async fn exists_by_slug(&self, slug: &str, exclude_id: Option<i64>) -> Result<bool>;
    async fn count(&self) -> Result<i64>;
    async fn count_active(&self) -> Result<i64>;
}

pub struct SqlxShortletRepository {
    pool: DynDatabasePool,
}

impl SqlxShortletRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn ShortletRepository> {
        Arc::new(Self::new(pool))
    }

    fn sqlite(&self) -> &SqlitePool {
        self.pool.sqlite()
    }
}

const SELECT_COLUMNS: &str = "SELECT id, title, slug, description, location, price_per_night, bedrooms, bathrooms, \
     max_guests, amenities, images, status, created_at, updated_at FROM shortlets";

#[async_trait]
impl ShortletRepository for SqlxShortletRepository {
    async fn create(&self, shortlet: &Shortlet) -> Result<Shortlet> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO shortlets (title, slug, description, location, price_per_night, bedrooms, bathrooms, \
             max_guests, amenities, images, status, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&shortlet.title)
        .bind(&shortlet.slug)
        .bind(&shortlet.description)
        .bind(&shortlet.location)
        .bind(shortlet.price_per_night)
        .bind(shortlet.bedrooms)
        .bind(shortlet.bathrooms)
        .bind(shortlet.max_guests)
        .bind(encode_list(&shortlet.amenities)?)
        .bind(encode_list(&shortlet.images)?)
        .bind(shortlet.status.as_str())
        .bind(now)
        .bind(now)
        .execute(self.sqlite())
        .await
        .context("Failed to create shortlet")?;

        Ok(Shortlet {
            id: result.last_insert_rowid(),
            created_at: now,
            updated_at: now,
            ..shortlet.clone()
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Shortlet>> {
        let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(id)
            .fetch_optional(self.sqlite())
            .await
            .context("Failed to get shortlet")?;
        row.map(|r| row_to_shortlet(&r)).transpose()
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Shortlet>> {
        let row = sqlx::query(&format!("{} WHERE slug = ?", SELECT_COLUMNS))
            .bind(slug)
            .fetch_optional(self.sqlite())
            .await
            .context("Failed to get shortlet")?;
        row.map(|r| row_to_shortlet(&r)).transpose()
    }

    async fn list(&self) -> Result<Vec<Shortlet>> {
        let rows = sqlx::query(&format!("{} ORDER BY id ASC", SELECT_COLUMNS))
            .fetch_all(self.sqlite())
            .await
            .context("Failed to list shortlets")?;
        rows.iter().map(row_to_shortlet).collect()
    }

    async fn list_active(&self) -> Result<Vec<Shortlet>> {
        let rows = sqlx::query(&format!("{} WHERE status = ? ORDER BY id ASC", SELECT_COLUMNS))
            .bind(ContentStatus::Active.as_str())
            .fetch_all(self.sqlite())
            .await
            .context("Failed to list active shortlets")?;
        rows.iter().map(row_to_shortlet).collect()
    }

    async fn update(&self, shortlet: &Shortlet) -> Result<Shortlet> {
        sqlx::query(
            "UPDATE shortlets SET title = ?, slug = ?, description = ?, location = ?, price_per_night = ?, \
             bedrooms = ?, bathrooms = ?, max_guests = ?, amenities = ?, images = ?, status = ?, updated_at = ? \
             WHERE id = ?",
        )
        .bind(&shortlet.title)
        .bind(&shortlet.slug)
        .bind(&shortlet.description)
        .bind(&shortlet.location)
        .bind(shortlet.price_per_night)
        .bind(shortlet.bedrooms)
        .bind(shortlet.bathrooms)
        .bind(shortlet.max_guests)
        .bind(encode_list(&shortlet.amenities)?)
        .bind(encode_list(&shortlet.images)?)
        .bind(shortlet.status.as_str())
        .bind(Utc::now())
        .bind(shortlet.id)
        .execute(self.sqlite())
        .await
        .context("Failed to update shortlet")?;

        self.get_by_id(shortlet.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Shortlet not found after update"))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM shortlets WHERE id = ?")
            .bind(id)
            .execute(self.sqlite())
            .await
            .context("Failed to delete shortlet")?;
        Ok(result.rows_affected() > 0)
    }

    async fn exists_by_slug(&self, slug: &str, exclude_id: Option<i64>) -> Result<bool> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM shortlets WHERE slug = ? AND id != ?")
            .bind(slug)
            .bind(exclude_id.unwrap_or(0))
            .fetch_one(self.sqlite())
            .await?;
        Ok(row.get::<i64, _>("count") > 0)
    }

    async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM shortlets")
            .fetch_one(self.sqlite())
            .await?;
        Ok(row.get("count"))
    }

    async fn count_active(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM shortlets WHERE status = ?")
            .bind(ContentStatus::Active.as_str())
            .fetch_one(self.sqlite())
            .await?;
        Ok(row.get("count"))
    }
}

fn row_to_shortlet(row: &sqlx::sqlite::SqliteRow) -> Result<Shortlet> {
    let status_str: String = row.try_get("status")?;
    let amenities: String = row.try_get("amenities")?;
    let images: String = row.try_get("images")?;
    Ok(Shortlet {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        slug: row.try_get("slug")?,
        description: row.try_get("description")?,
        location: row.try_get("location")?,
        price_per_night: row.try_get("price_per_night")?,
        bedrooms: row.try_get("bedrooms")?,
        bathrooms: row.try_get("bathrooms")?,
        max_guests: row.try_get("max_guests")?,
        amenities: decode_list(&amenities)?,
        images: decode_list(&images)?,
        status: status_str.parse().unwrap_or_default(),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
