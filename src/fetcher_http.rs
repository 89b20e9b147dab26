//! HTTP-based page fetcher using reqwest.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::fetcher::{resolve_url, Page, PageFetcher};
use crate::proxy::ProxyPool;
use crate::session::Session;
use crate::Result;

/// A page fetcher issuing plain GET requests through the session identity
/// and a randomly chosen proxy.
///
/// Clients are built once: one per proxy, aligned with the pool, plus a
/// direct client for an empty pool. Each request picks its own proxy, so
/// the choice is never shared between requests.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    base_url: Url,
    proxies: ProxyPool,
    direct: Client,
    proxied: Vec<Client>,
}

impl HttpFetcher {
    /// Creates a fetcher for `base_url`.
    pub fn new(base_url: Url, session: Session, proxies: ProxyPool) -> Result<Self> {
        let direct = session.client(None)?;
        let proxied = proxies
            .proxies()
            .iter()
            .map(|proxy| session.client(Some(proxy)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            base_url,
            proxies,
            direct,
            proxied,
        })
    }

    /// Returns the base origin.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the proxy pool.
    pub fn proxies(&self) -> &ProxyPool {
        &self.proxies
    }

    fn client(&self) -> &Client {
        match self.proxies.choose_index() {
            Some(index) => {
                debug!("Using proxy: {}", self.proxies.proxies()[index]);
                &self.proxied[index]
            }
            None => &self.direct,
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, params: &[(&str, String)]) -> Result<Page> {
        let url = resolve_url(&self.base_url, url)?;

        let response = self.client().get(url).query(params).send().await?;
        let status = response.status();
        let final_url = response.url().to_string();
        let body = response.text().await?;

        Ok(Page::new(final_url, status, body))
    }
}
