//! Storage abstractions for record persistence and output files.
//!
//! ## Files
//!
//! ```text
//! ./
//! ├── bloglistcache.json        # Cache: every enriched record, discovery order
//! ├── technetblogs.opml         # OPML subscription list
//! └── output/
//!     ├── README.template.md    # README template
//!     └── README.md             # Rendered README
//! ```

pub mod cache;

use std::path::Path;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::FeedRecord;

// Re-export for convenience
pub use cache::JsonFileCache;

/// Trait for record cache backends.
///
/// The cache is all-or-nothing: `save` replaces the whole record set and
/// `exists` alone decides whether discovery can be skipped.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Whether a saved record set is present.
    ///
    /// Only a missing file counts as absent; any other failure is an error.
    async fn exists(&self) -> Result<bool>;

    /// Load the full record set in saved order.
    async fn load(&self) -> Result<Vec<FeedRecord>>;

    /// Replace the saved record set.
    async fn save(&self, records: &[FeedRecord]) -> Result<()>;

    /// Human-readable location, for logs.
    fn location(&self) -> String;
}

/// Write `bytes` to `path`, creating parent directories and truncating any
/// existing file.
pub async fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    let target = path.display().to_string();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| AppError::render(&target, e))?;
    }
    tokio::fs::write(path, bytes)
        .await
        .map_err(|e| AppError::render(target, e))
}
