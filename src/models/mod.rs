// src/models/mod.rs

//! Domain models for feedfinder.

mod config;
mod record;

use std::collections::HashMap;

// Re-export all public types
pub use config::{
    Config, DiscoveryConfig, ENV_CACHE_PATH, ENV_OPML_PATH, ENV_README_PATH, EnrichmentConfig,
    FailurePolicy, HttpConfig, OutputConfig, PathsConfig, ReadmeConfig,
};
pub use record::FeedRecord;

/// Records keyed by their exact category text, in discovery order per key.
pub type CategoryMap = HashMap<String, Vec<FeedRecord>>;

/// Category labels of a grouped view, sorted lexicographically.
pub fn sorted_categories(groups: &CategoryMap) -> Vec<&str> {
    let mut keys: Vec<&str> = groups.keys().map(String::as_str).collect();
    keys.sort_unstable();
    keys
}
