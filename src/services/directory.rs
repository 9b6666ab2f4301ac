// src/services/directory.rs

//! Blog directory service.
//!
//! Lists the blogs linked from the community root page.

use scraper::{Html, Selector};

use crate::error::Result;
use crate::models::{DiscoveryConfig, FeedRecord};
use crate::utils::http::PageFetcher;
use crate::utils::parse_selector;
use crate::utils::url::resolve;

/// Service discovering blogs from the root page.
pub struct BlogDirectory<'a> {
    fetcher: &'a dyn PageFetcher,
    list_selector: Selector,
    link_selector: Selector,
}

impl<'a> BlogDirectory<'a> {
    /// Create a directory reader for the configured list selector.
    pub fn new(fetcher: &'a dyn PageFetcher, config: &DiscoveryConfig) -> Result<Self> {
        Ok(Self {
            fetcher,
            list_selector: parse_selector(&config.list_selector)?,
            link_selector: parse_selector("a")?,
        })
    }

    /// Fetch `root_url` and return one record per listed blog.
    pub async fn discover(&self, root_url: &str) -> Result<Vec<FeedRecord>> {
        let html = self.fetcher.fetch_text(root_url).await?;
        self.parse(&html, root_url)
    }

    /// Extract blog records from the root page markup.
    ///
    /// Entries without link text or `href` are skipped. Relative links are
    /// resolved against the origin of `root_url`.
    pub fn parse(&self, html: &str, root_url: &str) -> Result<Vec<FeedRecord>> {
        let document = Html::parse_document(html);
        let mut records = Vec::new();

        for (row, item) in document.select(&self.list_selector).enumerate() {
            let title: String = item
                .select(&self.link_selector)
                .flat_map(|a| a.text())
                .collect();
            let title = title.trim();
            let href = item
                .select(&self.link_selector)
                .next()
                .and_then(|a| a.value().attr("href"))
                .unwrap_or("")
                .trim();

            log::debug!("Row: {row}: Title: {title} URL: {href}");

            if title.is_empty() || href.is_empty() {
                continue;
            }

            records.push(FeedRecord::new(title, resolve(root_url, href)?));
        }

        Ok(records)
    }
}
