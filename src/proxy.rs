//! Egress proxy pool with per-request random selection.
//!
//! The pool is fixed for the lifetime of a crawler. Every outbound request
//! draws its own proxy through [`ProxyPool::choose`]; nothing about the
//! choice is stored, so concurrent requests never observe each other's
//! selection.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use reqwest::Proxy as ReqwestProxy;

use crate::{CrawlError, Result};

/// Proxy protocol type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProxyProtocol {
    /// HTTP proxy
    #[default]
    Http,
    /// HTTPS proxy
    Https,
    /// SOCKS5 proxy
    Socks5,
}

impl ProxyProtocol {
    fn scheme(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
            Self::Socks5 => "socks5",
        }
    }
}

/// A single proxy configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Proxy host (IP or domain)
    pub host: String,
    /// Proxy port
    pub port: u16,
    /// Proxy protocol
    pub protocol: ProxyProtocol,
    /// Optional username for authentication
    pub username: Option<String>,
    /// Optional password for authentication
    pub password: Option<String>,
}

impl ProxyConfig {
    /// Creates a new HTTP proxy configuration.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            protocol: ProxyProtocol::Http,
            username: None,
            password: None,
        }
    }

    /// Sets the proxy protocol.
    pub fn with_protocol(mut self, protocol: ProxyProtocol) -> Self {
        self.protocol = protocol;
        self
    }

    /// Sets authentication credentials.
    pub fn with_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Returns the proxy URL string.
    pub fn url(&self) -> String {
        let scheme = self.protocol.scheme();
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => {
                format!("{}://{}:{}@{}:{}", scheme, user, pass, self.host, self.port)
            }
            _ => format!("{}://{}:{}", scheme, self.host, self.port),
        }
    }

    /// Builds the reqwest proxy, applied to both http and https traffic.
    pub fn to_reqwest(&self) -> Result<ReqwestProxy> {
        ReqwestProxy::all(self.url())
            .map_err(|e| CrawlError::Proxy(format!("{}: {}", self, e)))
    }
}

impl fmt::Display for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl FromStr for ProxyConfig {
    type Err = CrawlError;

    /// Parses `host:port` (plain HTTP) or `scheme://[user:pass@]host:port`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.contains("://") {
            return parse_proxy_url(s);
        }

        let (host, port) = s
            .rsplit_once(':')
            .ok_or_else(|| CrawlError::Proxy(format!("missing port in '{}'", s)))?;
        if host.is_empty() {
            return Err(CrawlError::Proxy(format!("missing host in '{}'", s)));
        }
        let port = port
            .parse::<u16>()
            .map_err(|_| CrawlError::Proxy(format!("invalid port in '{}'", s)))?;

        Ok(Self::new(host, port))
    }
}

fn parse_proxy_url(s: &str) -> Result<ProxyConfig> {
    let url = url::Url::parse(s)?;

    let protocol = match url.scheme() {
        "http" => ProxyProtocol::Http,
        "https" => ProxyProtocol::Https,
        "socks5" => ProxyProtocol::Socks5,
        scheme => {
            return Err(CrawlError::Proxy(format!(
                "unsupported proxy protocol: {}",
                scheme
            )))
        }
    };

    let host = url
        .host_str()
        .ok_or_else(|| CrawlError::Proxy(format!("missing host in '{}'", s)))?;
    let port = url
        .port_or_known_default()
        .ok_or_else(|| CrawlError::Proxy(format!("missing port in '{}'", s)))?;

    let mut config = ProxyConfig::new(host, port).with_protocol(protocol);
    if let Some(password) = url.password() {
        config = config.with_auth(url.username(), password);
    }
    Ok(config)
}

/// An immutable pool of candidate egress proxies.
#[derive(Debug, Clone, Default)]
pub struct ProxyPool {
    proxies: Vec<ProxyConfig>,
}

impl ProxyPool {
    /// Creates an empty pool; requests go out directly.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a pool from static proxies.
    pub fn with_proxies(proxies: Vec<ProxyConfig>) -> Self {
        Self { proxies }
    }

    /// Parses a pool from `host:port` or proxy URL strings.
    pub fn parse<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let proxies = entries
            .into_iter()
            .map(|raw| raw.as_ref().parse())
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { proxies })
    }

    /// Returns the number of proxies in the pool.
    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    /// Returns whether the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }

    /// Returns the configured proxies in order.
    pub fn proxies(&self) -> &[ProxyConfig] {
        &self.proxies
    }

    /// Picks a proxy uniformly at random, or `None` for an empty pool.
    pub fn choose(&self) -> Option<&ProxyConfig> {
        self.choose_index().map(|index| &self.proxies[index])
    }

    /// Picks the index of a proxy uniformly at random.
    pub fn choose_index(&self) -> Option<usize> {
        if self.proxies.is_empty() {
            return None;
        }
        Some(rand::thread_rng().gen_range(0..self.proxies.len()))
    }
}
