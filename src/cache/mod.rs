//! Cache layer
//!
//! The public read path (published shortlet and tour listings, public site
//! settings) is served from an in-memory moka cache. Every content write
//! drops the affected key prefix.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ontour::cache::{create_cache, keys};
//! use ontour::config::CacheConfig;
//!
//! let cache = create_cache(&CacheConfig::default());
//! cache.set(keys::SHORTLETS_PUBLISHED, &shortlets).await?;
//! cache.delete_prefix(keys::SHORTLETS_PREFIX).await;
//! ```

mod memory;

pub use memory::{Generation, MemoryCache};

use std::sync::Arc;
use std::time::Duration;

use crate::config::CacheConfig;

/// Cache key layout
pub mod keys {
    pub const SHORTLETS_PREFIX: &str = "shortlets:";
    pub const SHORTLETS_PUBLISHED: &str = "shortlets:published";

    pub const TOURS_PREFIX: &str = "tours:";

    pub const SITE_SETTINGS: &str = "settings:site";

    /// Published tours, optionally narrowed to one category
    pub fn tours_published(category: Option<&str>) -> String {
        format!("{}published:{}", TOURS_PREFIX, category.unwrap_or("all"))
    }
}

/// Build the shared cache from configuration
pub fn create_cache(config: &CacheConfig) -> Arc<MemoryCache> {
    let ttl = Duration::from_secs(config.ttl_seconds);
    Arc::new(MemoryCache::with_capacity_and_ttl(config.max_capacity, ttl))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_cache_from_config() {
        let cache = create_cache(&CacheConfig::default());

        cache.set(keys::SITE_SETTINGS, &"value".to_string()).await.unwrap();
        let result: Option<String> = cache.get(keys::SITE_SETTINGS).await.unwrap();
        assert_eq!(result, Some("value".to_string()));
    }

    #[test]
    fn test_tour_keys_share_prefix() {
        assert_eq!(keys::tours_published(None), "tours:published:all");
        assert_eq!(keys::tours_published(Some("safari")), "tours:published:safari");
        assert!(keys::tours_published(Some("beach")).starts_with(keys::TOURS_PREFIX));
    }
}
