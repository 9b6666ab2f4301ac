// src/error.rs

//! Unified error handling for feedfinder.

use std::fmt;

use thiserror::Error;

/// Result type alias for feedfinder operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed at the transport level
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Feed link pattern failed to compile
    #[error("Invalid pattern: {0}")]
    Regex(#[from] regex::Error),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// The blog page carries no feed link
    #[error("Could not find the feed URL in {url}")]
    FeedNotFound { url: String },

    /// Record cache could not be read or written
    #[error("Cache error at {path}: {message}")]
    Cache { path: String, message: String },

    /// OPML or README output could not be produced
    #[error("Failed to render {target}: {message}")]
    Render { target: String, message: String },

    /// An enrichment worker died
    #[error("Worker error: {0}")]
    Worker(String),
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a cache error for the given location.
    pub fn cache(path: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Cache {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Create a render error for the given output.
    pub fn render(target: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Render {
            target: target.into(),
            message: message.to_string(),
        }
    }

    /// Whether this is a missing feed link rather than a transport failure.
    pub fn is_feed_not_found(&self) -> bool {
        matches!(self, Self::FeedNotFound { .. })
    }
}
