//! Test utilities shared by unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::utils::http::PageFetcher;

/// In-memory fetcher serving fixed bodies by URL.
///
/// Unknown URLs answer with a 404 status error.
#[derive(Default)]
pub struct StaticFetcher {
    pages: HashMap<String, (String, Duration)>,
    calls: AtomicUsize,
}

impl StaticFetcher {
    pub fn with_page(self, url: &str, body: &str) -> Self {
        self.with_delayed_page(url, body, Duration::ZERO)
    }

    /// Serve `body` for `url` after sleeping for `delay`.
    pub fn with_delayed_page(mut self, url: &str, body: &str, delay: Duration) -> Self {
        self.pages
            .insert(url.to_string(), (body.to_string(), delay));
        self
    }

    /// Number of fetches performed so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (body, delay) = self.pages.get(url).cloned().ok_or_else(|| {
            AppError::HttpStatus {
                url: url.to_string(),
                status: 404,
            }
        })?;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        Ok(body)
    }
}

/// A blog homepage carrying a feed link for `board` and a breadcrumb category.
pub fn blog_page(board: &str, category: &str) -> String {
    format!(
        r#"<html><head>
<link rel="alternate" type="application/rss+xml" href="/gxcuf89792/rss/board?board.id={board}"></link>
</head><body>
<nav><a class="crumb-category" href="/t5/{category}/ct-p/{category}">{category}</a></nav>
</body></html>"#
    )
}
