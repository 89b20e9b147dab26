//! Error types for the crawler library.

use thiserror::Error;

/// Result type alias for crawl operations.
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Errors that can occur while crawling.
#[derive(Error, Debug)]
pub enum CrawlError {
    /// Search kind outside the supported set.
    #[error("Unsupported search type: {0}")]
    InvalidSearchKind(String),

    /// HTTP transport failed (DNS, connect, timeout, body read).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Proxy specification is invalid or could not be applied.
    #[error("Invalid proxy: {0}")]
    Proxy(String),

    /// Failed to parse a selector or document.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// URL parsing error.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Configuration file is malformed.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Configuration file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error.
    #[error("{0}")]
    Other(String),
}
