// src/utils/url.rs

//! URL manipulation utilities.
//!
//! Feed paths carry literal `?` and `=` characters. Pushing them through
//! `Url::join` or `Url::set_path` would percent-encode them, so paths are
//! appended to the origin as plain text instead.

use url::Url;

use crate::error::{AppError, Result};

/// Scheme, host and non-default port of an http(s) URL, without a trailing slash.
///
/// # Examples
/// ```
/// use feedfinder::utils::url::origin;
///
/// assert_eq!(
///     origin("https://example.com/blogs/x").unwrap(),
///     "https://example.com"
/// );
/// ```
pub fn origin(url: &str) -> Result<String> {
    let parsed = Url::parse(url)?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(AppError::validation(format!(
            "Expected an absolute http(s) URL, got {url}"
        )));
    }
    Ok(parsed.origin().ascii_serialization())
}

/// Append `path` to the origin of `base` with exactly one separating slash.
///
/// The path of `base` is discarded and `path` is copied verbatim.
///
/// # Examples
/// ```
/// use feedfinder::utils::url::join_origin;
///
/// assert_eq!(
///     join_origin("https://example.com/blogs/x", "/rss/board?board.id=a-1").unwrap(),
///     "https://example.com/rss/board?board.id=a-1"
/// );
/// ```
pub fn join_origin(base: &str, path: &str) -> Result<String> {
    let origin = origin(base)?;
    Ok(format!("{}/{}", origin, path.trim_start_matches('/')))
}

/// Resolve a discovered link against the page it was found on.
///
/// Absolute http(s) links are kept and protocol-relative links take the
/// scheme of `base`. Anything else is treated as a path under the origin of
/// `base`.
pub fn resolve(base: &str, href: &str) -> Result<String> {
    if href.starts_with("http://") || href.starts_with("https://") {
        return Ok(href.to_string());
    }
    if href.starts_with("//") {
        let scheme = Url::parse(base)?.scheme().to_string();
        return Ok(format!("{scheme}:{href}"));
    }
    join_origin(base, href)
}
