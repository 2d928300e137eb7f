//! Database layer
//!
//! The content store: one SQLite table per collection (shortlets, tours,
//! media) plus a key/value table for site settings. Repositories in
//! [`repositories`] are the only code that speaks SQL.
//!
//! # Usage
//!
//! ```ignore
//! use ontour::config::DatabaseConfig;
//! use ontour::db::{create_pool, migrations};
//!
//! let pool = create_pool(&DatabaseConfig::default()).await?;
//! migrations::run_migrations(&pool).await?;
//! pool.ping().await?;
//! ```

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, create_test_pool, DatabasePool, DynDatabasePool, SqliteDatabase};
