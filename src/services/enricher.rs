// src/services/enricher.rs

//! Feed enrichment service.
//!
//! Reads a blog homepage and derives its feed URL and breadcrumb category.

use std::sync::Arc;

use regex::Regex;
use scraper::{Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{EnrichmentConfig, FeedRecord};
use crate::utils::http::PageFetcher;
use crate::utils::parse_selector;
use crate::utils::url::join_origin;

/// Service deriving `feed_url` and `category` for discovered blogs.
pub struct FeedEnricher {
    fetcher: Arc<dyn PageFetcher>,
    feed_pattern: Regex,
    category_selector: Selector,
}

impl FeedEnricher {
    /// Create an enricher using the pattern and selector from `config`.
    pub fn new(fetcher: Arc<dyn PageFetcher>, config: &EnrichmentConfig) -> Result<Self> {
        let feed_pattern = Regex::new(&config.feed_link_pattern)?;
        if feed_pattern.captures_len() < 2 {
            return Err(AppError::config(
                "feed link pattern has no capture group for the feed path",
            ));
        }

        Ok(Self {
            fetcher,
            feed_pattern,
            category_selector: parse_selector(&config.category_selector)?,
        })
    }

    /// Fetch the homepage of `record` and fill in its feed URL and category.
    ///
    /// A record without a URL is left untouched. The record is only modified
    /// once both values are known, so a failure leaves it as it was.
    pub async fn enrich(&self, record: &mut FeedRecord) -> Result<()> {
        if record.url.is_empty() {
            log::debug!("Skipping '{}': no URL to read", record.name);
            return Ok(());
        }

        let body = self.fetcher.fetch_text(&record.url).await?;
        let feed_url = self.feed_url(&record.url, &body)?;
        let category = self.category(&body);

        log::info!("Found URL: {feed_url}");
        if category.is_empty() {
            log::debug!("No category found for {}", record.url);
        }

        record.feed_url = feed_url;
        record.category = category;
        Ok(())
    }

    /// Build the feed URL from the feed link found in `body`.
    ///
    /// The link path is appended to the origin of `page_url` as-is.
    pub fn feed_url(&self, page_url: &str, body: &str) -> Result<String> {
        let path = self
            .feed_pattern
            .captures(body)
            .and_then(|caps| caps.name("url").or_else(|| caps.get(1)))
            .map(|m| m.as_str())
            .ok_or_else(|| AppError::FeedNotFound {
                url: page_url.to_string(),
            })?;

        join_origin(page_url, path)
    }

    /// Text of the first breadcrumb category in `body`, or empty.
    ///
    /// The text is kept verbatim since it becomes the grouping key.
    pub fn category(&self, body: &str) -> String {
        let document = Html::parse_document(body);
        document
            .select(&self.category_selector)
            .next()
            .map(|elem| elem.text().collect::<String>())
            .unwrap_or_default()
    }
}
