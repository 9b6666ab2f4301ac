//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::utils::parse_selector;

/// Environment variable overriding the OPML output path.
pub const ENV_OPML_PATH: &str = "OPMLPATH";
/// Environment variable overriding the record cache path.
pub const ENV_CACHE_PATH: &str = "CACHEPATH";
/// Environment variable overriding the README output path.
pub const ENV_README_PATH: &str = "READMEPATH";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Root page discovery
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    /// Per-blog enrichment and worker pool
    #[serde(default)]
    pub enrichment: EnrichmentConfig,

    /// Input and output file locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// OPML document settings
    #[serde(default)]
    pub output: OutputConfig,

    /// README index settings
    #[serde(default)]
    pub readme: ReadmeConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Apply path overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply path overrides from an arbitrary variable lookup.
    ///
    /// Empty values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = get(ENV_OPML_PATH) {
            log::debug!("{ENV_OPML_PATH} is set. Output being written to {path}");
            self.paths.opml_file = PathBuf::from(path);
        } else {
            log::debug!(
                "{ENV_OPML_PATH} is not set, so we're writing to {}",
                self.paths.opml_file.display()
            );
        }
        if let Some(path) = get(ENV_CACHE_PATH) {
            log::debug!("{ENV_CACHE_PATH} is set. Cache located at {path}");
            self.paths.cache_file = PathBuf::from(path);
        }
        if let Some(path) = get(ENV_README_PATH) {
            log::debug!("{ENV_README_PATH} is set. README being written to {path}");
            self.paths.readme_file = PathBuf::from(path);
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.enrichment.workers == 0 {
            return Err(AppError::validation("enrichment.workers must be > 0"));
        }
        if self.enrichment.queue_factor == 0 {
            return Err(AppError::validation("enrichment.queue_factor must be > 0"));
        }
        if self.output.title.trim().is_empty() {
            return Err(AppError::validation("output.title is empty"));
        }

        let root = url::Url::parse(&self.discovery.root_url)?;
        if !matches!(root.scheme(), "http" | "https") {
            return Err(AppError::validation(format!(
                "discovery.root_url must be http(s), got {}",
                root.scheme()
            )));
        }

        for selector in [
            &self.discovery.list_selector,
            &self.enrichment.category_selector,
        ] {
            parse_selector(selector)?;
        }

        let pattern = Regex::new(&self.enrichment.feed_link_pattern)?;
        if pattern.captures_len() < 2 {
            return Err(AppError::validation(
                "enrichment.feed_link_pattern needs a capture group for the feed path",
            ));
        }

        for (name, path) in [
            ("paths.cache_file", &self.paths.cache_file),
            ("paths.opml_file", &self.paths.opml_file),
        ] {
            if path.as_os_str().is_empty() {
                return Err(AppError::validation(format!("{name} is empty")));
            }
        }

        Ok(())
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds, 0 disables it
    #[serde(default)]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: 0,
        }
    }
}

/// Root page discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Community page listing every blog
    #[serde(default = "defaults::root_url")]
    pub root_url: String,

    /// CSS selector for one blog entry on the root page
    #[serde(default = "defaults::list_selector")]
    pub list_selector: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            root_url: defaults::root_url(),
            list_selector: defaults::list_selector(),
        }
    }
}

/// What the pool does when one record fails to enrich.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop the whole batch and return the error
    #[default]
    Abort,
    /// Log, keep the record unenriched, and carry on
    Skip,
}

/// Enrichment and worker pool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    /// Number of concurrent workers
    #[serde(default = "defaults::workers")]
    pub workers: usize,

    /// Queue depth per worker
    #[serde(default = "defaults::queue_factor")]
    pub queue_factor: usize,

    /// Failure handling for a single record
    #[serde(default)]
    pub on_failure: FailurePolicy,

    /// Regex whose first capture group is the feed path
    #[serde(default = "defaults::feed_link_pattern")]
    pub feed_link_pattern: String,

    /// CSS selector for the breadcrumb category
    #[serde(default = "defaults::category_selector")]
    pub category_selector: String,
}

impl EnrichmentConfig {
    /// Bounded queue depth for the worker pool.
    pub fn queue_depth(&self) -> usize {
        self.workers.max(1) * self.queue_factor.max(1)
    }
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            workers: defaults::workers(),
            queue_factor: defaults::queue_factor(),
            on_failure: FailurePolicy::default(),
            feed_link_pattern: defaults::feed_link_pattern(),
            category_selector: defaults::category_selector(),
        }
    }
}

/// File locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "defaults::cache_file")]
    pub cache_file: PathBuf,

    #[serde(default = "defaults::opml_file")]
    pub opml_file: PathBuf,

    #[serde(default = "defaults::readme_template")]
    pub readme_template: PathBuf,

    #[serde(default = "defaults::readme_file")]
    pub readme_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            cache_file: defaults::cache_file(),
            opml_file: defaults::opml_file(),
            readme_template: defaults::readme_template(),
            readme_file: defaults::readme_file(),
        }
    }
}

/// OPML document settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// `<head><title>` text
    #[serde(default = "defaults::title")]
    pub title: String,

    /// Text of the outline wrapping every category, empty for none
    #[serde(default = "defaults::root_outline")]
    pub root_outline: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            title: defaults::title(),
            root_outline: defaults::root_outline(),
        }
    }
}

/// README index settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadmeConfig {
    #[serde(default = "defaults::readme_enabled")]
    pub enabled: bool,

    /// Heading used for blogs without a category
    #[serde(default = "defaults::uncategorized_label")]
    pub uncategorized_label: String,
}

impl Default for ReadmeConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::readme_enabled(),
            uncategorized_label: defaults::uncategorized_label(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; feedfinder/0.1)".into()
    }

    // Discovery defaults
    pub fn root_url() -> String {
        "https://techcommunity.microsoft.com/t5/custom/page/page-id/Blogs".into()
    }
    pub fn list_selector() -> String {
        ".blogs-all-list li".into()
    }

    // Enrichment defaults
    pub fn workers() -> usize {
        6
    }
    pub fn queue_factor() -> usize {
        25
    }
    pub fn feed_link_pattern() -> String {
        r#"href="(?P<url>/gxcuf89792/rss/board\?board\.id=[\w\d-]+)"></link>"#.into()
    }
    pub fn category_selector() -> String {
        "a.crumb-category".into()
    }

    // Path defaults
    pub fn cache_file() -> PathBuf {
        "bloglistcache.json".into()
    }
    pub fn opml_file() -> PathBuf {
        "technetblogs.opml".into()
    }
    pub fn readme_template() -> PathBuf {
        "output/README.template.md".into()
    }
    pub fn readme_file() -> PathBuf {
        "output/README.md".into()
    }

    // Output defaults
    pub fn title() -> String {
        "Microsoft Tech Community Blogs".into()
    }
    pub fn root_outline() -> String {
        "Microsoft Technical Community Blogs".into()
    }

    // README defaults
    pub fn readme_enabled() -> bool {
        true
    }
    pub fn uncategorized_label() -> String {
        "Uncategorized".into()
    }
}
