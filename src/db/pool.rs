//! Database connection pool
//!
//! The content store lives in a single SQLite database. Callers hold a
//! `DynDatabasePool` so repositories and tests never depend on how the pool
//! was opened.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::sync::Arc;

use crate::config::DatabaseConfig;

/// Database pool trait shared by repositories and migrations.
#[async_trait]
pub trait DatabasePool: Send + Sync {
    /// Execute a raw SQL statement that doesn't return rows
    async fn execute(&self, query: &str) -> Result<u64>;

    /// Check if the database connection is healthy
    async fn ping(&self) -> Result<()>;

    /// Close the connection pool
    async fn close(&self);

    /// Underlying SQLite pool
    fn sqlite(&self) -> &SqlitePool;
}

/// SQLite connection pool implementation
pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl SqliteDatabase {
    /// Open `url`: a file path, a `sqlite:` URL, or `:memory:`.
    pub async fn new(url: &str) -> Result<Self> {
        let in_memory = is_memory_url(url);
        if !in_memory {
            ensure_parent_dir(database_file(url))?;
        }

        // Every in-memory connection is its own database, so pin to one.
        let options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(10)
        };

        let pool = options
            .connect(&connection_url(url))
            .await
            .with_context(|| format!("Failed to open content store at {}", url))?;

        Ok(Self { pool })
    }
}

fn is_memory_url(url: &str) -> bool {
    url == ":memory:" || url.starts_with("sqlite::memory:")
}

/// File path part of a database URL
fn database_file(url: &str) -> &str {
    let path = url.strip_prefix("sqlite:").unwrap_or(url);
    path.split_once('?').map_or(path, |(path, _)| path)
}

/// File databases are opened read-write-create unless the URL says otherwise.
fn connection_url(url: &str) -> String {
    match (is_memory_url(url), url.starts_with("sqlite:"), url.contains('?')) {
        (true, _, _) => "sqlite::memory:".to_string(),
        (false, true, true) => url.to_string(),
        (false, true, false) => format!("{}?mode=rwc", url),
        (false, false, _) => format!("sqlite:{}?mode=rwc", url),
    }
}

fn ensure_parent_dir(file: &str) -> Result<()> {
    match std::path::Path::new(file).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create database directory: {:?}", parent)),
        _ => Ok(()),
    }
}

#[async_trait]
impl DatabasePool for SqliteDatabase {
    async fn execute(&self, query: &str) -> Result<u64> {
        let result = sqlx::query(query)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to execute query: {}", query))?;
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("Database ping failed")?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }

    fn sqlite(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Type alias for a shared database pool
pub type DynDatabasePool = Arc<dyn DatabasePool>;

/// Open the content store described by `config`.
pub async fn create_pool(config: &DatabaseConfig) -> Result<DynDatabasePool> {
    let db = SqliteDatabase::new(&config.url).await?;
    Ok(Arc::new(db))
}

/// Create a SQLite in-memory database pool for testing
pub async fn create_test_pool() -> Result<DynDatabasePool> {
    let config = DatabaseConfig {
        url: ":memory:".to_string(),
    };
    create_pool(&config).await
}
