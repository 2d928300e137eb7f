//! Tour repository

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

use super::{decode_list, encode_list};
use crate::db::DynDatabasePool;
use crate::models::{ContentStatus, Tour, TourCategory};

#[async_trait]
pub trait TourRepository: Send + Sync {
    async fn create(&self, tour: &Tour) -> Result<Tour>;
    async fn get_by_id(&self, id: i64) -> Result<Option<Tour>>;
    async fn get_by_slug(&self, slug: &str) -> Result<Option<Tour>>;
    /// All records in insertion order
    async fn list(&self) -> Result<Vec<Tour>>;
    /// Active records, optionally restricted to one category
    async fn list_active(&self, category: Option<TourCategory>) -> Result<Vec<Tour>>;
    async fn update(&self, tour: &Tour) -> Result<Tour>;
    /// Returns `false` when no row had that id
    async fn delete(&self, id: i64) -> Result<bool>;
    async fn exists_by_slug(&self, slug: &str, exclude_id: Option<i64>) -> Result<bool>;
    async fn count(&self) -> Result<i64>;
    async fn count_active(&self) -> Result<i64>;
}

pub struct SqlxTourRepository {
    pool: DynDatabasePool,
}

impl SqlxTourRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn TourRepository> {
        Arc::new(Self::new(pool))
    }

    fn sqlite(&self) -> &SqlitePool {
        self.pool.sqlite()
    }
}

const SELECT_COLUMNS: &str = "SELECT id, title, slug, description, destination, duration, price_from, category, \
     inclusions, exclusions, images, status, created_at, updated_at FROM tours";

#[async_trait]
impl TourRepository for SqlxTourRepository {
    async fn create(&self, tour: &Tour) -> Result<Tour> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO tours (title, slug, description, destination, duration, price_from, category, \
             inclusions, exclusions, images, status, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&tour.title)
        .bind(&tour.slug)
        .bind(&tour.description)
        .bind(&tour.destination)
        .bind(&tour.duration)
        .bind(tour.price_from)
        .bind(tour.category.as_str())
        .bind(encode_list(&tour.inclusions)?)
        .bind(encode_list(&tour.exclusions)?)
        .bind(encode_list(&tour.images)?)
        .bind(tour.status.as_str())
        .bind(now)
        .bind(now)
        .execute(self.sqlite())
        .await
        .context("Failed to create tour")?;

        Ok(Tour {
            id: result.last_insert_rowid(),
            created_at: now,
            updated_at: now,
            ..tour.clone()
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Tour>> {
        let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(id)
            .fetch_optional(self.sqlite())
            .await
            .context("Failed to get tour")?;
        row.map(|r| row_to_tour(&r)).transpose()
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Tour>> {
        let row = sqlx::query(&format!("{} WHERE slug = ?", SELECT_COLUMNS))
            .bind(slug)
            .fetch_optional(self.sqlite())
            .await
            .context("Failed to get tour")?;
        row.map(|r| row_to_tour(&r)).transpose()
    }

    async fn list(&self) -> Result<Vec<Tour>> {
        let rows = sqlx::query(&format!("{} ORDER BY id ASC", SELECT_COLUMNS))
            .fetch_all(self.sqlite())
            .await
            .context("Failed to list tours")?;
        rows.iter().map(row_to_tour).collect()
    }

    async fn list_active(&self, category: Option<TourCategory>) -> Result<Vec<Tour>> {
        let rows = match category {
            Some(category) => {
                sqlx::query(&format!(
                    "{} WHERE status = ? AND category = ? ORDER BY id ASC",
                    SELECT_COLUMNS
                ))
                .bind(ContentStatus::Active.as_str())
                .bind(category.as_str())
                .fetch_all(self.sqlite())
                .await
            }
            None => {
                sqlx::query(&format!("{} WHERE status = ? ORDER BY id ASC", SELECT_COLUMNS))
                    .bind(ContentStatus::Active.as_str())
                    .fetch_all(self.sqlite())
                    .await
            }
        }
        .context("Failed to list active tours")?;
        rows.iter().map(row_to_tour).collect()
    }

    async fn update(&self, tour: &Tour) -> Result<Tour> {
        sqlx::query(
            "UPDATE tours SET title = ?, slug = ?, description = ?, destination = ?, duration = ?, \
             price_from = ?, category = ?, inclusions = ?, exclusions = ?, images = ?, status = ?, \
             updated_at = ? WHERE id = ?",
        )
        .bind(&tour.title)
        .bind(&tour.slug)
        .bind(&tour.description)
        .bind(&tour.destination)
        .bind(&tour.duration)
        .bind(tour.price_from)
        .bind(tour.category.as_str())
        .bind(encode_list(&tour.inclusions)?)
        .bind(encode_list(&tour.exclusions)?)
        .bind(encode_list(&tour.images)?)
        .bind(tour.status.as_str())
        .bind(Utc::now())
        .bind(tour.id)
        .execute(self.sqlite())
        .await
        .context("Failed to update tour")?;

        self.get_by_id(tour.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Tour not found after update"))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tours WHERE id = ?")
            .bind(id)
            .execute(self.sqlite())
            .await
            .context("Failed to delete tour")?;
        Ok(result.rows_affected() > 0)
    }

    async fn exists_by_slug(&self, slug: &str, exclude_id: Option<i64>) -> Result<bool> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM tours WHERE slug = ? AND id != ?")
            .bind(slug)
            .bind(exclude_id.unwrap_or(0))
            .fetch_one(self.sqlite())
            .await?;
        Ok(row.get::<i64, _>("count") > 0)
    }

    async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM tours")
            .fetch_one(self.sqlite())
            .await?;
        Ok(row.get("count"))
    }

    async fn count_active(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM tours WHERE status = ?")
            .bind(ContentStatus::Active.as_str())
            .fetch_one(self.sqlite())
            .await?;
        Ok(row.get("count"))
    }
}

fn row_to_tour(row: &sqlx::sqlite::SqliteRow) -> Result<Tour> {
    let status_str: String = row.try_get("status")?;
    let category_str: String = row.try_get("category")?;
    let inclusions: String = row.try_get("inclusions")?;
    let exclusions: String = row.try_get("exclusions")?;
    let images: String = row.try_get("images")?;
    Ok(Tour {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        slug: row.try_get("slug")?,
        description: row.try_get("description")?,
        destination: row.try_get("destination")?,
        duration: row.try_get("duration")?,
        price_from: row.try_get("price_from")?,
        category: category_str.parse()?,
        inclusions: decode_list(&inclusions)?,
        exclusions: decode_list(&exclusions)?,
        images: decode_list(&images)?,
        status: status_str.parse().unwrap_or_default(),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
