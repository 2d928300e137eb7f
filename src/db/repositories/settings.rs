//! Settings repository
//!
//! Key/value storage behind the SiteSettings singleton.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use std::collections::HashMap;
use std::sync::Arc;

use crate::db::DynDatabasePool;

/// A setting key-value pair
#[derive(Debug, Clone)]
pub struct Setting {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

/// Repository trait for settings operations
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Get a single setting by key
    async fn get(&self, key: &str) -> Result<Option<Setting>>;

    /// Get all settings
    async fn get_all(&self) -> Result<Vec<Setting>>;

    /// Get multiple settings by keys; absent keys are omitted
    async fn get_many(&self, keys: &[&str]) -> Result<HashMap<String, String>>;

    /// Set a single setting
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Set multiple settings in one transaction
    async fn set_many(&self, settings: &HashMap<String, String>) -> Result<()>;
}

/// SQLx-based settings repository
pub struct SqlxSettingsRepository {
    pool: DynDatabasePool,
}

impl SqlxSettingsRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn SettingsRepository> {
        Arc::new(Self::new(pool))
    }

    fn sqlite(&self) -> &SqlitePool {
        self.pool.sqlite()
    }
}

const UPSERT_SQL: &str = "INSERT INTO settings (key, value, updated_at) VALUES (?, ?, ?)
     ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at";

#[async_trait]
impl SettingsRepository for SqlxSettingsRepository {
    async fn get(&self, key: &str) -> Result<Option<Setting>> {
        let row = sqlx::query("SELECT key, value, updated_at FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(self.sqlite())
            .await
            .context("Failed to get setting")?;

        Ok(row.map(|r| row_to_setting(&r)))
    }

    async fn get_all(&self) -> Result<Vec<Setting>> {
        let rows = sqlx::query("SELECT key, value, updated_at FROM settings ORDER BY key")
            .fetch_all(self.sqlite())
            .await
            .context("Failed to list settings")?;

        Ok(rows.iter().map(row_to_setting).collect())
    }

    async fn get_many(&self, keys: &[&str]) -> Result<HashMap<String, String>> {
        let mut result = HashMap::new();
        for key in keys {
            if let Some(setting) = self.get(key).await? {
                result.insert(setting.key, setting.value);
            }
        }
        Ok(result)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(UPSERT_SQL)
            .bind(key)
            .bind(value)
            .bind(Utc::now())
            .execute(self.sqlite())
            .await
            .context("Failed to save setting")?;
        Ok(())
    }

    async fn set_many(&self, settings: &HashMap<String, String>) -> Result<()> {
        let now = Utc::now();
        let mut tx = self.sqlite().begin().await?;
        for (key, value) in settings {
            sqlx::query(UPSERT_SQL)
                .bind(key)
                .bind(value)
                .bind(now)
                .execute(&mut *tx)
                .await
                .with_context(|| format!("Failed to save setting '{}'", key))?;
        }
        tx.commit().await.context("Failed to commit settings")?;
        Ok(())
    }
}

fn row_to_setting(row: &sqlx::sqlite::SqliteRow) -> Setting {
    Setting {
        key: row.get("key"),
        value: row.get("value"),
        updated_at: row.get("updated_at"),
    }
}
