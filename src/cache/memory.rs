//! In-memory cache implementation using moka
//!
//! Values are stored as JSON strings so one cache instance can hold
//! listings of any serializable type.

use anyhow::{Context, Result};
use moka::future::Cache;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
struct CacheEntry {
    data: Arc<String>,
}

impl CacheEntry {
    fn new<T: Serialize>(value: &T) -> Result<Self> {
        let json = serde_json::to_string(value).context("Failed to serialize cache value")?;
        Ok(Self {
            data: Arc::new(json),
        })
    }

    fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.data).context("Failed to deserialize cache value")
    }
}

/// Write counter for one collection.
///
/// Writers bump it after the store commits and before dropping cached
/// entries; readers note it before querying the store.
#[derive(Debug, Default)]
pub struct Generation(AtomicU64);

impl Generation {
    pub fn current(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    pub fn bump(&self) {
        self.0.fetch_add(1, Ordering::AcqRel);
    }
}

/// In-memory cache using moka
///
/// All entries share the TTL given at construction.
pub struct MemoryCache {
    cache: Cache<String, CacheEntry>,
    ttl: Duration,
}

impl std::fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCache")
            .field("entry_count", &self.cache.entry_count())
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl MemoryCache {
    pub fn with_capacity_and_ttl(max_capacity: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();

        Self { cache, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns `Ok(None)` if the key is missing or expired.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.cache.get(key).await {
            Some(entry) => Ok(Some(entry.deserialize()?)),
            None => Ok(None),
        }
    }

    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let entry = CacheEntry::new(value)?;
        self.cache.insert(key.to_string(), entry).await;
        Ok(())
    }

    /// Cache a value read from the store while `generation` was `seen`.
    ///
    /// Nothing stays cached if a write bumped the generation meanwhile,
    /// including one that lands between the check and the insert.
    pub async fn set_unless_changed<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        generation: &Generation,
        seen: u64,
    ) -> Result<()> {
        if generation.current() != seen {
            return Ok(());
        }
        self.set(key, value).await?;
        if generation.current() != seen {
            self.delete(key).await;
        }
        Ok(())
    }

    pub async fn delete(&self, key: &str) {
        self.cache.invalidate(key).await;
    }

    /// Drop every entry whose key starts with `prefix`
    pub async fn delete_prefix(&self, prefix: &str) {
        let keys: Vec<String> = self
            .cache
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| (*key).clone())
            .collect();

        for key in keys {
            self.cache.invalidate(&key).await;
        }
    }

    pub async fn clear(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> MemoryCache {
        MemoryCache::with_capacity_and_ttl(100, Duration::from_secs(60))
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = cache();
        cache.set("key1", &vec!["a".to_string(), "b".to_string()]).await.unwrap();

        let result: Option<Vec<String>> = cache.get("key1").await.unwrap();
        assert_eq!(result, Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[tokio::test]
    async fn test_get_with_wrong_type_is_an_error() {
        let cache = cache();
        cache.set("key1", &"text".to_string()).await.unwrap();

        let result: Result<Option<Vec<i64>>> = cache.get("key1").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_delete_prefix_keeps_other_keys() {
        let cache = cache();
        cache.set("tours:published:all", &1).await.unwrap();
        cache.set("tours:published:safari", &2).await.unwrap();
        cache.set("shortlets:published", &3).await.unwrap();

        cache.delete_prefix("tours:").await;

        assert_eq!(cache.get::<i32>("tours:published:all").await.unwrap(), None);
        assert_eq!(cache.get::<i32>("tours:published:safari").await.unwrap(), None);
        assert_eq!(cache.get::<i32>("shortlets:published").await.unwrap(), Some(3));
    }

    #[tokio::test]
    async fn test_set_unless_changed_skips_stale_reads() {
        let cache = cache();
        let generation = Generation::default();

        let seen = generation.current();
        cache.set_unless_changed("fresh", &1, &generation, seen).await.unwrap();
        assert_eq!(cache.get::<i32>("fresh").await.unwrap(), Some(1));

        let seen = generation.current();
        generation.bump();
        cache.set_unless_changed("stale", &2, &generation, seen).await.unwrap();
        assert_eq!(cache.get::<i32>("stale").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = cache();
        cache.set("a", &1).await.unwrap();
        cache.clear().await;
        assert_eq!(cache.get::<i32>("a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_entries_expire_after_ttl() {
        let cache = MemoryCache::with_capacity_and_ttl(100, Duration::from_millis(10));
        cache.set("key", &"value".to_string()).await.unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
        cache.cache.run_pending_tasks().await;

        assert_eq!(cache.get::<String>("key").await.unwrap(), None);
    }
}
