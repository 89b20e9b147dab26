//! Page fetcher abstraction for retrieving HTML content.

use async_trait::async_trait;
use reqwest::StatusCode;
use url::Url;

use crate::Result;

/// Base origin every relative URL is resolved against.
pub const GITHUB_BASE_URL: &str = "https://github.com/";

/// A fetched page.
///
/// Error statuses are not errors at this level; check [`Page::is_success`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Final URL after redirects.
    pub url: String,
    /// HTTP status code.
    pub status: StatusCode,
    /// Response body.
    pub body: String,
}

impl Page {
    /// Creates a page from its parts.
    pub fn new(url: impl Into<String>, status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status,
            body: body.into(),
        }
    }

    /// Returns whether the status is 2xx or 3xx.
    pub fn is_success(&self) -> bool {
        self.status.is_success() || self.status.is_redirection()
    }
}

/// Trait for fetching a page relative to the site's base origin.
///
/// `Err` means the transport failed (DNS, connect, timeout); an HTTP
/// error status is returned as an `Ok` page. Each call picks its own
/// egress route, so implementations must be safe to call concurrently.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches `url` (relative or absolute) with the given query parameters.
    async fn fetch(&self, url: &str, params: &[(&str, String)]) -> Result<Page>;
}

/// Resolves `href` against `base` the way a browser would.
pub fn resolve_url(base: &Url, href: &str) -> Result<Url> {
    Ok(base.join(href)?)
}
