//! Shortlet service
//!
//! CRUD over short-stay listings plus the cached public read path.
//! Every write is validated in full, including slug uniqueness, before the
//! repository is touched.

use std::sync::Arc;

use crate::cache::{keys, Generation, MemoryCache};
use crate::db::repositories::ShortletRepository;
use crate::models::{CreateShortletInput, Shortlet, UpdateShortletInput};

use super::validation::Validate;
use super::error::is_unique_violation;
use super::ContentError;

pub struct ShortletService {
    repo: Arc<dyn ShortletRepository>,
    cache: Arc<MemoryCache>,
    generation: Generation,
}

impl ShortletService {
    pub fn new(repo: Arc<dyn ShortletRepository>, cache: Arc<MemoryCache>) -> Self {
        Self {
            repo,
            cache,
            generation: Generation::default(),
        }
    }

    /// Create a shortlet
    ///
    /// # Errors
    /// - `Validation` for a missing or invalid field, or a slug already in use
    pub async fn create(&self, input: CreateShortletInput) -> Result<Shortlet, ContentError> {
        let shortlet = Shortlet::from_input(input);
        shortlet.validate()?;
        self.ensure_slug_free(&shortlet.slug, None).await?;

        let created = self
            .repo
            .create(&shortlet)
            .await
            .map_err(|e| write_error(e, &shortlet.slug))?;
        self.invalidate_cache().await;

        tracing::info!(id = created.id, slug = %created.slug, "Shortlet created");
        Ok(created)
    }

    pub async fn get(&self, id: i64) -> Result<Shortlet, ContentError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// All shortlets regardless of status, in insertion order
    pub async fn list(&self) -> Result<Vec<Shortlet>, ContentError> {
        Ok(self.repo.list().await?)
    }

    /// Active shortlets only, served from cache when warm
    pub async fn list_published(&self) -> Result<Vec<Shortlet>, ContentError> {
        match self.cache.get::<Vec<Shortlet>>(keys::SHORTLETS_PUBLISHED).await {
            Ok(Some(cached)) => return Ok(cached),
            Ok(None) => {}
            Err(e) => tracing::warn!("Discarding unreadable shortlet cache entry: {:#}", e),
        }

        let seen = self.generation.current();
        let shortlets = self.repo.list_active().await?;
        if let Err(e) = self
            .cache
            .set_unless_changed(keys::SHORTLETS_PUBLISHED, &shortlets, &self.generation, seen)
            .await
        {
            tracing::warn!("Failed to cache published shortlets: {:#}", e);
        }
        Ok(shortlets)
    }

    /// An inactive shortlet is indistinguishable from a missing one here.
    pub async fn get_published_by_slug(&self, slug: &str) -> Result<Shortlet, ContentError> {
        self.repo
            .get_by_slug(slug)
            .await?
            .filter(|s| s.status.is_published())
            .ok_or_else(|| ContentError::not_found(format!("Shortlet not found: {}", slug)))
    }

    /// Merge `input` over the stored record and save it.
    ///
    /// The merged record is validated as a whole; on any error the stored
    /// record is left untouched.
    pub async fn update(&self, id: i64, input: UpdateShortletInput) -> Result<Shortlet, ContentError> {
        let mut shortlet = self.get(id).await?;
        shortlet.apply(input);
        shortlet.validate()?;
        self.ensure_slug_free(&shortlet.slug, Some(id)).await?;

        let updated = self
            .repo
            .update(&shortlet)
            .await
            .map_err(|e| write_error(e, &shortlet.slug))?;
        self.invalidate_cache().await;

        tracing::info!(id, slug = %updated.slug, "Shortlet updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ContentError> {
        if !self.repo.delete(id).await? {
            return Err(not_found(id));
        }
        self.invalidate_cache().await;

        tracing::info!(id, "Shortlet deleted");
        Ok(())
    }

    pub async fn count(&self) -> Result<i64, ContentError> {
        Ok(self.repo.count().await?)
    }

    pub async fn count_published(&self) -> Result<i64, ContentError> {
        Ok(self.repo.count_active().await?)
    }

    async fn ensure_slug_free(&self, slug: &str, exclude_id: Option<i64>) -> Result<(), ContentError> {
        if self.repo.exists_by_slug(slug, exclude_id).await? {
            return Err(slug_taken(slug));
        }
        Ok(())
    }

    async fn invalidate_cache(&self) {
        self.generation.bump();
        self.cache.delete_prefix(keys::SHORTLETS_PREFIX).await;
    }
}

fn slug_taken(slug: &str) -> ContentError {
    ContentError::validation(format!("A shortlet with slug '{}' already exists", slug))
}

/// A concurrent write can claim the slug after `ensure_slug_free` passed.
fn write_error(err: anyhow::Error, slug: &str) -> ContentError {
    if is_unique_violation(&err) {
        slug_taken(slug)
    } else {
        ContentError::Internal(err)
    }
}

fn not_found(id: i64) -> ContentError {
    ContentError::not_found(format!("Shortlet not found: {}", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::create_cache;
    use crate::config::CacheConfig;
    use crate::db::repositories::SqlxShortletRepository;
    use crate::db::{create_test_pool, migrations};
    use crate::models::ContentStatus;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::sync::Notify;

    async fn setup_service() -> ShortletService {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        ShortletService::new(
            SqlxShortletRepository::boxed(pool),
            create_cache(&CacheConfig::default()),
        )
    }

    fn input(slug: &str, status: ContentStatus) -> CreateShortletInput {
        CreateShortletInput {
            title: "Ikoyi Loft".to_string(),
            slug: slug.to_string(),
            description: "Two-bedroom loft".to_string(),
            location: "Ikoyi, Lagos".to_string(),
            price_per_night: 50_000,
            bedrooms: 2,
            bathrooms: 2,
            max_guests: 4,
            amenities: vec!["Wi-Fi".to_string(), "Generator".to_string()],
            images: vec!["/uploads/loft.jpg".to_string()],
            status,
        }
    }

    #[tokio::test]
    async fn test_create_then_get_returns_input() {
        let service = setup_service().await;
        let created = service
            .create(input("ikoyi-loft", ContentStatus::Active))
            .await
            .unwrap();

        let fetched = service.get(created.id).await.unwrap();
        let expected = Shortlet {
            id: fetched.id,
            created_at: fetched.created_at,
            updated_at: fetched.updated_at,
            ..Shortlet::from_input(input("ikoyi-loft", ContentStatus::Active))
        };
        assert_eq!(fetched, expected);
    }

    #[tokio::test]
    async fn test_duplicate_slug_rejected_without_writing() {
        let service = setup_service().await;
        service.create(input("ikoyi-loft", ContentStatus::Active)).await.unwrap();

        let result = service.create(input("ikoyi-loft", ContentStatus::Inactive)).await;
        assert!(matches!(result, Err(ContentError::Validation(_))));
        assert_eq!(service.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_store() {
        let service = setup_service().await;
        let mut bad = input("ikoyi-loft", ContentStatus::Active);
        bad.price_per_night = 0;

        assert!(matches!(service.create(bad).await, Err(ContentError::Validation(_))));
        assert_eq!(service.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_missing_id_leaves_store_unchanged() {
        let service = setup_service().await;
        let created = service.create(input("ikoyi-loft", ContentStatus::Active)).await.unwrap();
        let before = service.list().await.unwrap();

        let result = service
            .update(
                created.id + 100,
                UpdateShortletInput {
                    title: Some("Renamed".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(ContentError::NotFound(_))));
        assert_eq!(service.list().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_update_merges_and_revalidates() {
        let service = setup_service().await;
        let first = service.create(input("ikoyi-loft", ContentStatus::Active)).await.unwrap();
        let second = service.create(input("vi-studio", ContentStatus::Active)).await.unwrap();

        let updated = service
            .update(
                first.id,
                UpdateShortletInput {
                    price_per_night: Some(65_000),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.price_per_night, 65_000);
        assert_eq!(updated.title, "Ikoyi Loft");

        // Keeping its own slug is fine, taking another record's is not.
        let same_slug = UpdateShortletInput {
            slug: Some("ikoyi-loft".to_string()),
            ..Default::default()
        };
        assert!(service.update(first.id, same_slug).await.is_ok());

        let taken = UpdateShortletInput {
            slug: Some("vi-studio".to_string()),
            ..Default::default()
        };
        assert!(matches!(service.update(first.id, taken).await, Err(ContentError::Validation(_))));

        let negative = UpdateShortletInput {
            price_per_night: Some(-5),
            ..Default::default()
        };
        assert!(service.update(second.id, negative).await.is_err());
        assert_eq!(service.get(second.id).await.unwrap().price_per_night, 50_000);
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let service = setup_service().await;
        let created = service.create(input("ikoyi-loft", ContentStatus::Active)).await.unwrap();

        service.delete(created.id).await.unwrap();
        assert!(matches!(service.get(created.id).await, Err(ContentError::NotFound(_))));
        assert!(matches!(service.delete(created.id).await, Err(ContentError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_public_path_only_sees_active_and_tracks_writes() {
        let service = setup_service().await;
        let active = service.create(input("ikoyi-loft", ContentStatus::Active)).await.unwrap();
        let draft = service.create(input("vi-studio", ContentStatus::Inactive)).await.unwrap();

        let published = service.list_published().await.unwrap();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].id, active.id);
        assert!(service.get_published_by_slug("vi-studio").await.is_err());

        // Publishing the draft must not be hidden by the warm cache.
        service
            .update(
                draft.id,
                UpdateShortletInput {
                    status: Some(ContentStatus::Active),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(service.list_published().await.unwrap().len(), 2);
        assert_eq!(service.count_published().await.unwrap(), 2);
        assert!(service.get_published_by_slug("vi-studio").await.is_ok());
    }

    /// Store wrapper that can lose the slug race and stall public reads.
    struct RacingRepo {
        inner: Arc<dyn ShortletRepository>,
        blind_slug_check: bool,
        pause_reads: AtomicBool,
        read_done: Notify,
        resume: Notify,
    }

    impl RacingRepo {
        fn new(inner: Arc<dyn ShortletRepository>, blind_slug_check: bool) -> Self {
            Self {
                inner,
                blind_slug_check,
                pause_reads: AtomicBool::new(false),
                read_done: Notify::new(),
                resume: Notify::new(),
            }
        }
    }

    #[async_trait::async_trait]
    impl ShortletRepository for RacingRepo {
        async fn create(&self, shortlet: &Shortlet) -> anyhow::Result<Shortlet> {
            self.inner.create(shortlet).await
        }
        async fn get_by_id(&self, id: i64) -> anyhow::Result<Option<Shortlet>> {
            self.inner.get_by_id(id).await
        }
        async fn get_by_slug(&self, slug: &str) -> anyhow::Result<Option<Shortlet>> {
            self.inner.get_by_slug(slug).await
        }
        async fn list(&self) -> anyhow::Result<Vec<Shortlet>> {
            self.inner.list().await
        }
        async fn list_active(&self) -> anyhow::Result<Vec<Shortlet>> {
            let rows = self.inner.list_active().await?;
            if self.pause_reads.load(Ordering::SeqCst) {
                self.read_done.notify_one();
                self.resume.notified().await;
            }
            Ok(rows)
        }
        async fn update(&self, shortlet: &Shortlet) -> anyhow::Result<Shortlet> {
            self.inner.update(shortlet).await
        }
        async fn delete(&self, id: i64) -> anyhow::Result<bool> {
            self.inner.delete(id).await
        }
        async fn exists_by_slug(&self, slug: &str, exclude_id: Option<i64>) -> anyhow::Result<bool> {
            if self.blind_slug_check {
                return Ok(false);
            }
            self.inner.exists_by_slug(slug, exclude_id).await
        }
        async fn count(&self) -> anyhow::Result<i64> {
            self.inner.count().await
        }
        async fn count_active(&self) -> anyhow::Result<i64> {
            self.inner.count_active().await
        }
    }

    async fn racing_service(blind_slug_check: bool) -> (Arc<RacingRepo>, Arc<ShortletService>) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        let repo = Arc::new(RacingRepo::new(
            SqlxShortletRepository::boxed(pool),
            blind_slug_check,
        ));
        let service = ShortletService::new(repo.clone(), create_cache(&CacheConfig::default()));
        (repo, Arc::new(service))
    }

    #[tokio::test]
    async fn test_slug_claimed_after_check_is_validation_error() {
        let (_, service) = racing_service(true).await;
        service.create(input("ikoyi-loft", ContentStatus::Active)).await.unwrap();

        match service.create(input("ikoyi-loft", ContentStatus::Active)).await {
            Err(ContentError::Validation(msg)) => {
                assert_eq!(msg, "A shortlet with slug 'ikoyi-loft' already exists")
            }
            other => panic!("expected a validation error, got {:?}", other),
        }

        let second = service.create(input("vi-studio", ContentStatus::Active)).await.unwrap();
        let taken = UpdateShortletInput {
            slug: Some("ikoyi-loft".to_string()),
            ..Default::default()
        };
        assert!(matches!(service.update(second.id, taken).await, Err(ContentError::Validation(_))));
    }

    #[tokio::test]
    async fn test_read_overtaken_by_unpublish_is_not_cached() {
        let (repo, service) = racing_service(false).await;
        let created = service.create(input("ikoyi-loft", ContentStatus::Active)).await.unwrap();

        repo.pause_reads.store(true, Ordering::SeqCst);
        let reader = tokio::spawn({
            let service = service.clone();
            async move { service.list_published().await }
        });
        repo.read_done.notified().await;

        service
            .update(
                created.id,
                UpdateShortletInput {
                    status: Some(ContentStatus::Inactive),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        repo.resume.notify_one();

        // The slow reader still answers with what it read.
        assert_eq!(reader.await.unwrap().unwrap().len(), 1);

        repo.pause_reads.store(false, Ordering::SeqCst);
        assert!(service.list_published().await.unwrap().is_empty());
        assert!(service.get_published_by_slug("ikoyi-loft").await.is_err());
    }
}
