//! Local JSON file cache of enriched records.
//!
//! Saves write a temporary sibling and rename it into place, so a cache file
//! on disk is always a complete record set.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::FeedRecord;
use crate::storage::RecordStore;

/// Record cache stored as pretty-printed JSON.
#[derive(Debug, Clone)]
pub struct JsonFileCache {
    path: PathBuf,
}

impl JsonFileCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn error(&self, message: impl std::fmt::Display) -> AppError {
        AppError::cache(self.location(), message)
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.error(e))?;
        }

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp)
            .await
            .map_err(|e| self.error(e))?;
        file.write_all(bytes).await.map_err(|e| self.error(e))?;
        file.flush().await.map_err(|e| self.error(e))?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| self.error(e))
    }
}

#[async_trait]
impl RecordStore for JsonFileCache {
    async fn exists(&self) -> Result<bool> {
        tokio::fs::try_exists(&self.path)
            .await
            .map_err(|e| self.error(e))
    }

    async fn load(&self) -> Result<Vec<FeedRecord>> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| self.error(e))?;
        let records: Vec<FeedRecord> =
            serde_json::from_slice(&bytes).map_err(|e| self.error(e))?;
        log::debug!(
            "Loaded {} records from {}",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }

    async fn save(&self, records: &[FeedRecord]) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(records)?;
        self.write_bytes(&bytes).await?;
        log::info!(
            "Cached {} records to {}",
            records.len(),
            self.path.display()
        );
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
