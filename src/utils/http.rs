// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::HttpConfig;

/// Create a configured asynchronous HTTP client.
///
/// A `timeout_secs` of zero leaves requests without a timeout.
pub fn create_async_client(config: &HttpConfig) -> Result<Client> {
    let mut builder = Client::builder().user_agent(&config.user_agent);
    if config.timeout_secs > 0 {
        builder = builder.timeout(Duration::from_secs(config.timeout_secs));
    }
    Ok(builder.build()?)
}

/// Source of page bodies for discovery and enrichment.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url` and return its body as text.
    ///
    /// Transport failures and non-success statuses are errors.
    async fn fetch_text(&self, url: &str) -> Result<String>;
}

/// `PageFetcher` backed by a reqwest client.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a fetcher with a client configured from `config`.
    pub fn from_config(config: &HttpConfig) -> Result<Self> {
        Ok(Self::new(create_async_client(config)?))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        log::debug!("Reading URL: {url}");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        log::debug!("Status code is {}, so reading content.", status.as_u16());

        Ok(response.text().await?)
    }
}
