//! JSON crawl job configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::crawler::CrawlerConfig;
use crate::enrich::DEFAULT_WORKERS;
use crate::proxy::ProxyPool;
use crate::{CrawlError, Result};

/// A crawl job as written in the config file.
///
/// ```json
/// {
///     "keywords": ["flask", "fastapi"],
///     "type": "Repositories",
///     "proxies": ["194.126.37.94:8080"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// Search terms, combined with `OR`.
    pub keywords: Vec<String>,
    /// Search kind, case-insensitive.
    #[serde(rename = "type")]
    pub search_type: String,
    /// Egress proxies as `host:port` or proxy URLs.
    #[serde(default)]
    pub proxies: Option<Vec<String>>,
    /// Concurrent repository page fetches.
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

fn default_workers() -> usize {
    DEFAULT_WORKERS
}

fn default_timeout() -> u64 {
    30
}

impl CrawlConfig {
    /// Reads and validates a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Parses and validates a config document.
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.keywords.is_empty() {
            return Err(CrawlError::Config("keywords must not be empty".to_string()));
        }
        if self.keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(CrawlError::Config("keywords must not be blank".to_string()));
        }
        if self.timeout == 0 {
            return Err(CrawlError::Config("timeout must be positive".to_string()));
        }
        Ok(())
    }

    /// Returns the search type normalized to lowercase.
    ///
    /// Not validated here; the crawler rejects unknown kinds.
    pub fn search_type(&self) -> String {
        self.search_type.to_lowercase()
    }

    /// Builds the runtime crawler configuration.
    pub fn crawler_config(&self) -> Result<CrawlerConfig> {
        let proxies = ProxyPool::parse(self.proxies.iter().flatten())?;
        Ok(CrawlerConfig::default()
            .with_proxies(proxies)
            .with_workers(self.workers)
            .with_timeout(Duration::from_secs(self.timeout)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "keywords": ["flask", "fastapi"],
            "proxies": ["194.126.37.94:8080", "13.78.125.167:8080"],
            "type": "Repositories"
        }"#;
        let config = CrawlConfig::from_json(json).unwrap();
        assert_eq!(config.keywords, vec!["flask", "fastapi"]);
        assert_eq!(config.search_type(), "repositories");
        assert_eq!(config.proxies.as_ref().map(Vec::len), Some(2));
        assert_eq!(config.workers, 10); // default
        assert_eq!(config.timeout, 30); // default
    }

    #[test]
    fn test_config_proxies_optional() {
        let config = CrawlConfig::from_json(r#"{"keywords":["nova"],"type":"issues"}"#).unwrap();
        assert!(config.proxies.is_none());
        let crawler = config.crawler_config().unwrap();
        assert!(crawler.proxies.is_empty());

        let config =
            CrawlConfig::from_json(r#"{"keywords":["nova"],"type":"issues","proxies":null}"#).unwrap();
        assert!(config.proxies.is_none());
    }

    #[test]
    fn test_config_keeps_unknown_type_for_crawler() {
        let config = CrawlConfig::from_json(r#"{"keywords":["x"],"type":"Invalid"}"#).unwrap();
        assert_eq!(config.search_type(), "invalid");
    }

    #[test]
    fn test_config_rejects_empty_keywords() {
        let err = CrawlConfig::from_json(r#"{"keywords":[],"type":"issues"}"#).unwrap_err();
        assert!(matches!(err, CrawlError::Config(_)));
        let err = CrawlConfig::from_json(r#"{"keywords":["ok"," "],"type":"issues"}"#).unwrap_err();
        assert!(matches!(err, CrawlError::Config(_)));
    }

    #[test]
    fn test_config_rejects_missing_type() {
        let err = CrawlConfig::from_json(r#"{"keywords":["x"]}"#).unwrap_err();
        assert!(matches!(err, CrawlError::Json(_)));
    }

    #[test]
    fn test_config_rejects_zero_timeout() {
        let err = CrawlConfig::from_json(r#"{"keywords":["x"],"type":"wikis","timeout":0}"#)
            .unwrap_err();
        assert!(matches!(err, CrawlError::Config(_)));
    }

    #[test]
    fn test_crawler_config_from_file_settings() {
        let config = CrawlConfig::from_json(
            r#"{"keywords":["x"],"type":"wikis","proxies":["10.0.0.1:3128"],"workers":3,"timeout":7}"#,
        )
        .unwrap();
        let crawler = config.crawler_config().unwrap();
        assert_eq!(crawler.proxies.len(), 1);
        assert_eq!(crawler.workers, 3);
        assert_eq!(crawler.timeout, Duration::from_secs(7));
    }

    #[test]
    fn test_crawler_config_invalid_proxy() {
        let config =
            CrawlConfig::from_json(r#"{"keywords":["x"],"type":"wikis","proxies":["nope"]}"#).unwrap();
        assert!(matches!(config.crawler_config(), Err(CrawlError::Proxy(_))));
    }

    #[test]
    fn test_config_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"keywords":["django"],"type":"Wikis"}}"#).unwrap();

        let config = CrawlConfig::load(file.path()).unwrap();
        assert_eq!(config.keywords, vec!["django"]);
        assert_eq!(config.search_type(), "wikis");
    }

    #[test]
    fn test_config_load_missing_file() {
        let err = CrawlConfig::load("/nonexistent/config.json").unwrap_err();
        assert!(matches!(err, CrawlError::Io(_)));
    }
}
