// src/models/record.rs

//! Blog record data structure.

use serde::{Deserialize, Serialize};

/// A discovered blog and the values derived from its homepage.
///
/// `name` and `url` come from discovery. `feed_url` and `category` stay empty
/// until enrichment succeeds and are then written together, once.
///
/// Field names are serialized in the casing used by existing cache files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FeedRecord {
    /// Display title of the blog
    pub name: String,

    /// Homepage URL
    pub url: String,

    /// RSS/Atom endpoint
    #[serde(default)]
    pub feed_url: String,

    /// Breadcrumb category, used as the grouping key
    #[serde(default)]
    pub category: String,
}

impl FeedRecord {
    /// Create a record straight out of discovery.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            feed_url: String::new(),
            category: String::new(),
        }
    }

    /// Whether a feed URL has been derived for this record.
    pub fn is_enriched(&self) -> bool {
        !self.feed_url.is_empty()
    }
}
