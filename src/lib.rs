//! # github-search-crawler
//!
//! Crawls the first page of GitHub search results and, for repository
//! searches, enriches each hit with data scraped from its repository page.
//!
//! - Random egress proxy per request
//! - Optional authenticated session via `GITHUB_USER_SESSION`
//! - Best-effort CSS selector extraction
//! - Bounded concurrent repository enrichment
//!
//! ## Example
//!
//! ```rust,no_run
//! use github_search_crawler::{CrawlerConfig, GitHubCrawler, ProxyPool};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = CrawlerConfig::default()
//!         .with_proxies(ProxyPool::parse(["148.72.140.24:30127"])?)
//!         .with_user_session_from_env();
//!     let crawler = GitHubCrawler::new(config)?;
//!
//!     let results = crawler.crawl(&["wagtail-json-widget"], "repositories").await?;
//!     for result in &results {
//!         println!("{}: {:?}", result.url, result.detail());
//!     }
//!     Ok(())
//! }
//! ```

mod crawler;
mod enrich;
mod error;
mod fetcher_http;
mod query;
mod result;

pub mod config;
pub mod extract;
pub mod fetcher;
pub mod proxy;
pub mod session;

pub use crawler::{CrawlerConfig, GitHubCrawler};
pub use enrich::{enrich_repositories, DEFAULT_WORKERS};
pub use error::{CrawlError, Result};
pub use fetcher::{Page, PageFetcher};
pub use fetcher_http::HttpFetcher;
pub use proxy::{ProxyConfig, ProxyPool};
pub use query::{SearchKind, SearchQuery};
pub use result::{LanguageStats, RepositoryDetail, SearchHit, SearchResult};
pub use session::Session;
