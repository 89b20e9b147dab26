//! Search page crawling and per-kind dispatch.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, warn};
use url::Url;

use crate::enrich::{enrich_repositories, fetch_repository_detail, DEFAULT_WORKERS};
use crate::extract::extract_search_results;
use crate::fetcher::{resolve_url, PageFetcher, GITHUB_BASE_URL};
use crate::fetcher_http::HttpFetcher;
use crate::proxy::ProxyPool;
use crate::result::{RepositoryDetail, SearchResult};
use crate::session::{Session, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, USER_SESSION_ENV};
use crate::{Result, SearchKind, SearchQuery};

/// Runtime configuration for a [`GitHubCrawler`].
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// Origin relative result links are resolved against.
    pub base_url: Url,
    /// Egress proxies, one picked at random per request.
    pub proxies: ProxyPool,
    /// `user_session` cookie value for authenticated crawling.
    pub user_session: Option<String>,
    /// User agent header.
    pub user_agent: String,
    /// Concurrent repository page fetches.
    pub workers: usize,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(GITHUB_BASE_URL).expect("Invalid GitHub base URL"),
            proxies: ProxyPool::new(),
            user_session: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            workers: DEFAULT_WORKERS,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl CrawlerConfig {
    /// Sets the base origin.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    /// Sets the proxy pool.
    pub fn with_proxies(mut self, proxies: ProxyPool) -> Self {
        self.proxies = proxies;
        self
    }

    /// Sets the session cookie value.
    pub fn with_user_session(mut self, token: Option<String>) -> Self {
        self.user_session = token;
        self
    }

    /// Reads the session cookie value from `GITHUB_USER_SESSION`.
    pub fn with_user_session_from_env(self) -> Self {
        self.with_user_session(std::env::var(USER_SESSION_ENV).ok())
    }

    /// Sets the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Sets the enrichment worker count.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Crawls GitHub search pages and enriches repository results.
pub struct GitHubCrawler {
    base_url: Url,
    fetcher: Arc<dyn PageFetcher>,
    workers: usize,
}

impl GitHubCrawler {
    /// Creates a crawler issuing real HTTP requests.
    ///
    /// Fails if an HTTP client cannot be built for one of the proxies.
    pub fn new(config: CrawlerConfig) -> Result<Self> {
        let session = Session::new(&config.base_url)
            .with_user_session(config.user_session)
            .with_user_agent(config.user_agent)
            .with_timeout(config.timeout);
        let fetcher = HttpFetcher::new(config.base_url.clone(), session, config.proxies)?;

        Ok(Self::with_fetcher(config.base_url, Arc::new(fetcher)).with_workers(config.workers))
    }

    /// Creates a crawler on top of a custom fetcher.
    pub fn with_fetcher(base_url: Url, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            base_url,
            fetcher,
            workers: DEFAULT_WORKERS,
        }
    }

    /// Sets the enrichment worker count.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Returns the base origin.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the enrichment worker count.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Crawls the first results page for `terms`.
    ///
    /// Fails only when `kind` is not one of `repositories`, `issues` or
    /// `wikis`. A failed search page request yields an empty list.
    pub async fn crawl<S: AsRef<str>>(&self, terms: &[S], kind: &str) -> Result<Vec<SearchResult>> {
        let kind: SearchKind = kind.parse()?;
        let query = SearchQuery::new(terms.iter().map(|t| t.as_ref()), kind);
        self.search(&query).await
    }

    /// Crawls the first results page for an already validated query.
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>> {
        let params = query.params();
        debug!("Searching github for '{}' ({})", query.query_string(), query.kind);

        let page = match self.fetcher.fetch("search", &params).await {
            Ok(page) => page,
            Err(e) => {
                error!("Failed to request github search page: {}", e);
                return Ok(Vec::new());
            }
        };
        if !page.is_success() {
            error!(
                "Failed to request github search page (status {})",
                page.status.as_u16()
            );
            return Ok(Vec::new());
        }

        let urls = self.resolve_hits(&page.body)?;
        debug!("Search page returned {} results", urls.len());

        let results = match query.kind {
            SearchKind::Repositories => self.handle_repository_results(urls).await,
            SearchKind::Issues | SearchKind::Wikis => {
                urls.into_iter().map(SearchResult::new).collect()
            }
        };
        Ok(results)
    }

    /// Fetches and parses one repository page; `None` if the request failed.
    pub async fn crawl_repository_page(&self, url: &str) -> Option<RepositoryDetail> {
        fetch_repository_detail(self.fetcher.as_ref(), url).await
    }

    /// Extracts result links and resolves them against the base origin.
    ///
    /// Every hit yields exactly one URL. A missing or unresolvable `href`
    /// resolves to the base origin itself.
    fn resolve_hits(&self, html: &str) -> Result<Vec<String>> {
        let hits = extract_search_results(html)?;
        let urls = hits
            .into_iter()
            .map(|hit| {
                let Some(href) = hit.href else {
                    debug!("Search result without href, using base origin");
                    return self.base_url.to_string();
                };
                match resolve_url(&self.base_url, &href) {
                    Ok(url) => url.to_string(),
                    Err(e) => {
                        warn!("Bad search result href '{}', using base origin: {}", href, e);
                        self.base_url.to_string()
                    }
                }
            })
            .collect();
        Ok(urls)
    }

    async fn handle_repository_results(&self, urls: Vec<String>) -> Vec<SearchResult> {
        let details = enrich_repositories(Arc::clone(&self.fetcher), urls.clone(), self.workers).await;
        urls.into_iter()
            .zip(details)
            .map(|(url, detail)| SearchResult::new(url).with_extra(detail))
            .collect()
    }
}
