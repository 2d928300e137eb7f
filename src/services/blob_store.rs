//! Blob storage for media binaries

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Where uploaded bytes live. Records in the media table refer to blobs by name.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, name: &str, data: &[u8]) -> Result<()>;
    async fn delete(&self, name: &str) -> Result<()>;
    /// Public URL the blob is served from
    fn url_for(&self, name: &str) -> String;
}

/// Blobs as files in one directory, served by the static `/uploads` route
pub struct LocalBlobStore {
    root: PathBuf,
    url_prefix: String,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            url_prefix: "/uploads".to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            anyhow::bail!("Invalid blob name: {}", name);
        }
        Ok(self.root.join(name))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, name: &str, data: &[u8]) -> Result<()> {
        let path = self.path_for(name)?;
        fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("Failed to create upload dir: {:?}", self.root))?;
        fs::write(&path, data)
            .await
            .with_context(|| format!("Failed to write blob: {:?}", path))
    }

    async fn delete(&self, name: &str) -> Result<()> {
        let path = self.path_for(name)?;
        fs::remove_file(&path)
            .await
            .with_context(|| format!("Failed to remove blob: {:?}", path))
    }

    fn url_for(&self, name: &str) -> String {
        format!("{}/{}", self.url_prefix, name)
    }
}
