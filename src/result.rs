//! Crawl result types.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Language name to percentage share in sidebar order; `None` when the
/// share was unparsable.
pub type LanguageStats = IndexMap<String, Option<f64>>;

/// Data scraped from a repository page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepositoryDetail {
    /// Repository owner login.
    pub owner: Option<String>,
    /// Language breakdown from the sidebar.
    pub language_stats: LanguageStats,
}

/// A single search result.
///
/// `extra` is only present for repository searches. There it serializes
/// as the detail object, or as `null` when the repository page could not
/// be fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Absolute result URL.
    pub url: String,
    /// Repository enrichment.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_or_null"
    )]
    pub extra: Option<Option<RepositoryDetail>>,
}

impl SearchResult {
    /// Creates a result without enrichment.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            extra: None,
        }
    }

    /// Attaches the outcome of repository enrichment.
    pub fn with_extra(mut self, detail: Option<RepositoryDetail>) -> Self {
        self.extra = Some(detail);
        self
    }

    /// Returns the repository detail, if enrichment succeeded.
    pub fn detail(&self) -> Option<&RepositoryDetail> {
        self.extra.as_ref().and_then(Option::as_ref)
    }
}

/// Distinguishes an explicit `null` (`Some(None)`) from a missing key (`None`).
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Hyperlink captured from a search-results page, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// Raw `href` attribute, `None` if the anchor had none.
    pub href: Option<String>,
}
