//! Media library service
//!
//! Uploads are accepted per file: a rejected file is reported in the
//! batch outcome and the remaining files are still stored.

use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::UploadConfig;
use crate::db::repositories::MediaRepository;
use crate::models::{Media, UpdateMediaInput};

use super::blob_store::BlobStore;
use super::ContentError;

/// One file of an upload batch
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub original_name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// Result of an upload batch
#[derive(Debug, Default, Serialize)]
pub struct UploadOutcome {
    pub media: Vec<Media>,
    /// `"<original name>: <reason>"` per rejected file
    pub failed: Vec<String>,
}

pub struct MediaService {
    repo: Arc<dyn MediaRepository>,
    blobs: Arc<dyn BlobStore>,
    config: UploadConfig,
}

impl MediaService {
    pub fn new(repo: Arc<dyn MediaRepository>, blobs: Arc<dyn BlobStore>, config: UploadConfig) -> Self {
        Self { repo, blobs, config }
    }

    pub async fn upload(&self, files: Vec<UploadFile>, uploaded_by: i64) -> Result<UploadOutcome, ContentError> {
        if files.is_empty() {
            return Err(ContentError::validation("No files provided"));
        }

        let mut outcome = UploadOutcome::default();
        for file in files {
            if let Err(reason) = self.check_file(&file) {
                outcome.failed.push(format!("{}: {}", file.original_name, reason));
                continue;
            }

            match self.store(&file, uploaded_by).await {
                Ok(media) => {
                    tracing::info!(id = media.id, filename = %media.filename, size = media.size, "Media uploaded");
                    outcome.media.push(media);
                }
                Err(e) => {
                    tracing::error!("Failed to store upload {}: {:#}", file.original_name, e);
                    outcome.failed.push(format!("{}: could not be saved", file.original_name));
                }
            }
        }

        Ok(outcome)
    }

    fn check_file(&self, file: &UploadFile) -> Result<(), String> {
        if !self.config.is_type_allowed(&file.mime_type) {
            return Err(format!("invalid type {}", file.mime_type));
        }
        if file.data.is_empty() {
            return Err("file is empty".to_string());
        }
        if file.data.len() as u64 > self.config.max_file_size {
            return Err(format!(
                "file too large (max {} MB)",
                self.config.max_file_size / 1024 / 1024
            ));
        }
        Ok(())
    }

    async fn store(&self, file: &UploadFile, uploaded_by: i64) -> anyhow::Result<Media> {
        let ext = file_extension(&file.original_name, &file.mime_type);
        let filename = format!("{}.{}", Uuid::new_v4(), ext);
        self.blobs.put(&filename, &file.data).await?;

        let media = Media {
            id: 0,
            url: self.blobs.url_for(&filename),
            filename,
            original_name: file.original_name.clone(),
            mime_type: file.mime_type.clone(),
            size: file.data.len() as i64,
            alt_text: None,
            uploaded_by,
            created_at: chrono::Utc::now(),
        };

        match self.repo.create(&media).await {
            Ok(created) => Ok(created),
            Err(e) => {
                if let Err(cleanup) = self.blobs.delete(&media.filename).await {
                    tracing::warn!("Failed to remove orphaned blob {}: {:#}", media.filename, cleanup);
                }
                Err(e)
            }
        }
    }

    /// Whole library, or the items whose original name or alt text contains `query`
    pub async fn list(&self, query: Option<&str>) -> Result<Vec<Media>, ContentError> {
        let items = match query.map(str::trim).filter(|q| !q.is_empty()) {
            Some(q) => self.repo.search(q).await?,
            None => self.repo.list().await?,
        };
        Ok(items)
    }

    pub async fn get(&self, id: i64) -> Result<Media, ContentError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Only the alt text is editable; a blank value clears it.
    pub async fn update(&self, id: i64, input: UpdateMediaInput) -> Result<Media, ContentError> {
        let alt_text = input
            .alt_text
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let updated = self
            .repo
            .update_alt_text(id, alt_text)
            .await?
            .ok_or_else(|| not_found(id))?;

        tracing::info!(id, "Media updated");
        Ok(updated)
    }

    /// Remove the record, then its blob.
    ///
    /// Shortlet and tour image lists that point at the file are left as they are.
    pub async fn delete(&self, id: i64) -> Result<(), ContentError> {
        let media = self.get(id).await?;
        if !self.repo.delete(id).await? {
            return Err(not_found(id));
        }

        if let Err(e) = self.blobs.delete(&media.filename).await {
            tracing::warn!("Media {} deleted but blob removal failed: {:#}", id, e);
        }

        tracing::info!(id, filename = %media.filename, "Media deleted");
        Ok(())
    }

    pub async fn count(&self) -> Result<i64, ContentError> {
        Ok(self.repo.count().await?)
    }
}

fn not_found(id: i64) -> ContentError {
    ContentError::not_found(format!("Media not found: {}", id))
}

/// Extension from the original name, else from the MIME type
fn file_extension(filename: &str, mime_type: &str) -> String {
    if let Some((_, ext)) = filename.rsplit_once('.') {
        if !ext.is_empty() && ext.len() < 10 && ext.chars().all(|c| c.is_ascii_alphanumeric()) {
            return ext.to_lowercase();
        }
    }

    match mime_type {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/svg+xml" => "svg",
        "video/mp4" => "mp4",
        "application/pdf" => "pdf",
        _ => "bin",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::SqlxMediaRepository;
    use crate::db::{create_test_pool, migrations};
    use crate::services::LocalBlobStore;
    use tempfile::TempDir;

    async fn setup_service() -> (MediaService, TempDir) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = UploadConfig {
            path: dir.path().to_path_buf(),
            max_file_size: 1024,
            ..UploadConfig::default()
        };
        let service = MediaService::new(
            SqlxMediaRepository::boxed(pool),
            Arc::new(LocalBlobStore::new(dir.path())),
            config,
        );
        (service, dir)
    }

    fn file(name: &str, mime: &str, size: usize) -> UploadFile {
        UploadFile {
            original_name: name.to_string(),
            mime_type: mime.to_string(),
            data: vec![7u8; size],
        }
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("Pool.JPG", "image/jpeg"), "jpg");
        assert_eq!(file_extension("no-extension", "image/png"), "png");
        assert_eq!(file_extension("weird.", "application/pdf"), "pdf");
        assert_eq!(file_extension("blob", "application/zip"), "bin");
    }

    #[tokio::test]
    async fn test_upload_batch_keeps_going_past_rejections() {
        let (service, dir) = setup_service().await;
        let outcome = service
            .upload(
                vec![
                    file("pool.jpg", "image/jpeg", 100),
                    file("script.sh", "text/x-shellscript", 10),
                    file("empty.png", "image/png", 0),
                    file("huge.png", "image/png", 4096),
                    file("brochure.pdf", "application/pdf", 200),
                ],
                1,
            )
            .await
            .unwrap();

        assert_eq!(outcome.media.len(), 2);
        assert_eq!(outcome.failed.len(), 3);
        assert!(outcome.failed[0].starts_with("script.sh: invalid type"));
        assert_eq!(outcome.failed[1], "empty.png: file is empty");
        assert!(outcome.failed[2].starts_with("huge.png: file too large"));

        let stored = &outcome.media[0];
        assert_eq!(stored.original_name, "pool.jpg");
        assert_eq!(stored.size, 100);
        assert!(stored.filename.ends_with(".jpg"));
        assert_eq!(stored.url, format!("/uploads/{}", stored.filename));
        assert!(dir.path().join(&stored.filename).exists());
        assert_eq!(service.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_upload_without_files() {
        let (service, _dir) = setup_service().await;
        assert!(matches!(service.upload(vec![], 1).await, Err(ContentError::Validation(_))));
    }

    #[tokio::test]
    async fn test_alt_text_update_and_search() {
        let (service, _dir) = setup_service().await;
        let outcome = service
            .upload(vec![file("IMG_001.jpg", "image/jpeg", 10)], 3)
            .await
            .unwrap();
        let id = outcome.media[0].id;

        let updated = service
            .update(id, UpdateMediaInput { alt_text: Some("  Rooftop pool ".to_string()) })
            .await
            .unwrap();
        assert_eq!(updated.alt_text.as_deref(), Some("Rooftop pool"));
        assert_eq!(service.list(Some("rooftop")).await.unwrap().len(), 1);
        assert_eq!(service.list(Some("img_001")).await.unwrap().len(), 1);
        assert!(service.list(Some("beach")).await.unwrap().is_empty());
        assert_eq!(service.list(Some("   ")).await.unwrap().len(), 1);

        let cleared = service
            .update(id, UpdateMediaInput { alt_text: Some(String::new()) })
            .await
            .unwrap();
        assert_eq!(cleared.alt_text, None);

        assert!(matches!(
            service.update(999, UpdateMediaInput::default()).await,
            Err(ContentError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_removes_record_and_blob() {
        let (service, dir) = setup_service().await;
        let outcome = service
            .upload(vec![file("pool.jpg", "image/jpeg", 10)], 1)
            .await
            .unwrap();
        let media = &outcome.media[0];

        service.delete(media.id).await.unwrap();
        assert!(!dir.path().join(&media.filename).exists());
        assert!(matches!(service.get(media.id).await, Err(ContentError::NotFound(_))));
        assert!(matches!(service.delete(media.id).await, Err(ContentError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_succeeds_when_blob_already_gone() {
        let (service, dir) = setup_service().await;
        let outcome = service
            .upload(vec![file("pool.jpg", "image/jpeg", 10)], 1)
            .await
            .unwrap();
        let media = &outcome.media[0];
        std::fs::remove_file(dir.path().join(&media.filename)).unwrap();

        service.delete(media.id).await.unwrap();
        assert_eq!(service.count().await.unwrap(), 0);
    }
}
