//! Tour service

use std::sync::Arc;

use crate::cache::{keys, Generation, MemoryCache};
use crate::db::repositories::TourRepository;
use crate::models::{CreateTourInput, Tour, TourCategory, UpdateTourInput};

use super::validation::{parse_category, Validate};
use super::error::is_unique_violation;
use super::ContentError;

pub struct TourService {
    repo: Arc<dyn TourRepository>,
    cache: Arc<MemoryCache>,
    generation: Generation,
}

impl TourService {
    pub fn new(repo: Arc<dyn TourRepository>, cache: Arc<MemoryCache>) -> Self {
        Self {
            repo,
            cache,
            generation: Generation::default(),
        }
    }

    pub async fn create(&self, input: CreateTourInput) -> Result<Tour, ContentError> {
        input.validate()?;
        let category = parse_category(&input.category)?;
        let tour = Tour::from_input(input, category);
        self.ensure_slug_free(&tour.slug, None).await?;

        let created = self
            .repo
            .create(&tour)
            .await
            .map_err(|e| write_error(e, &tour.slug))?;
        self.invalidate_cache().await;

        tracing::info!(id = created.id, slug = %created.slug, category = %created.category, "Tour created");
        Ok(created)
    }

    pub async fn get(&self, id: i64) -> Result<Tour, ContentError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn list(&self) -> Result<Vec<Tour>, ContentError> {
        Ok(self.repo.list().await?)
    }

    /// Active tours, optionally narrowed to one category
    pub async fn list_published(&self, category: Option<TourCategory>) -> Result<Vec<Tour>, ContentError> {
        let key = keys::tours_published(category.map(TourCategory::as_str));
        match self.cache.get::<Vec<Tour>>(&key).await {
            Ok(Some(cached)) => return Ok(cached),
            Ok(None) => {}
            Err(e) => tracing::warn!("Discarding unreadable tour cache entry: {:#}", e),
        }

        let seen = self.generation.current();
        let tours = self.repo.list_active(category).await?;
        if let Err(e) = self
            .cache
            .set_unless_changed(&key, &tours, &self.generation, seen)
            .await
        {
            tracing::warn!("Failed to cache published tours: {:#}", e);
        }
        Ok(tours)
    }

    pub async fn get_published_by_slug(&self, slug: &str) -> Result<Tour, ContentError> {
        self.repo
            .get_by_slug(slug)
            .await?
            .filter(|t| t.status.is_published())
            .ok_or_else(|| ContentError::not_found(format!("Tour not found: {}", slug)))
    }

    /// Merge `input` over the stored record, re-validate and save.
    pub async fn update(&self, id: i64, input: UpdateTourInput) -> Result<Tour, ContentError> {
        let mut tour = self.get(id).await?;
        let category = input.category.as_deref().map(parse_category).transpose()?;
        tour.apply(input, category);
        tour.validate()?;
        self.ensure_slug_free(&tour.slug, Some(id)).await?;

        let updated = self
            .repo
            .update(&tour)
            .await
            .map_err(|e| write_error(e, &tour.slug))?;
        self.invalidate_cache().await;

        tracing::info!(id, slug = %updated.slug, "Tour updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ContentError> {
        if !self.repo.delete(id).await? {
            return Err(not_found(id));
        }
        self.invalidate_cache().await;

        tracing::info!(id, "Tour deleted");
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
        self.cache.delete_prefix(keys::TOURS_PREFIX).await;
    }
}

fn slug_taken(slug: &str) -> ContentError {
    ContentError::validation(format!("A tour with slug '{}' already exists", slug))
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
    ContentError::not_found(format!("Tour not found: {}", id))
}
