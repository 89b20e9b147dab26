//! Outbound session identity: browser headers and the optional login cookie.

use std::fmt;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, COOKIE, HOST};
use reqwest::Client;
use tracing::warn;
use url::Url;

use crate::proxy::ProxyConfig;
use crate::Result;

/// Environment variable holding the GitHub `user_session` cookie value.
pub const USER_SESSION_ENV: &str = "GITHUB_USER_SESSION";

/// Desktop Safari user agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.6 Safari/605.1.15";

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Identity shared by all requests of one crawler.
///
/// Headers and cookies are fixed once built. The session never stores a
/// proxy: callers pass the proxy chosen for each request to [`Session::client`].
#[derive(Clone)]
pub struct Session {
    host: String,
    user_agent: String,
    user_session: Option<String>,
    timeout: Duration,
}

impl Session {
    /// Creates an anonymous session targeting the host of `base_url`.
    pub fn new(base_url: &Url) -> Self {
        let host = match (base_url.host_str(), base_url.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => String::new(),
        };

        Self {
            host,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            user_session: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Creates a session, picking up the login cookie from the environment.
    pub fn from_env(base_url: &Url) -> Self {
        Self::new(base_url).with_user_session(std::env::var(USER_SESSION_ENV).ok())
    }

    /// Sets the `user_session` cookie value. Empty values are ignored.
    pub fn with_user_session(mut self, token: Option<String>) -> Self {
        self.user_session = token.filter(|t| !t.trim().is_empty());
        self
    }

    /// Overrides the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns whether requests are sent authenticated.
    pub fn is_authenticated(&self) -> bool {
        self.user_session.is_some()
    }

    /// Returns the per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the user agent.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Builds the fixed header set, user agent excluded.
    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));

        match HeaderValue::from_str(&self.host) {
            Ok(value) if !self.host.is_empty() => {
                headers.insert(HOST, value);
            }
            Ok(_) => {}
            Err(e) => warn!("Skipping Host header '{}': {}", self.host, e),
        }

        if let Some(ref token) = self.user_session {
            let cookie = format!(
                "__Host-user_session_same_site={token}; user_session={token}",
                token = token
            );
            match HeaderValue::from_str(&cookie) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    headers.insert(COOKIE, value);
                }
                Err(_) => warn!("{} contains invalid characters, crawling anonymously", USER_SESSION_ENV),
            }
        }

        headers
    }

    /// Creates a client carrying this identity, routed through `proxy`.
    ///
    /// Build once per proxy and reuse; the client pools connections.
    ///
    /// Without a proxy the client also ignores system proxy variables.
    pub fn client(&self, proxy: Option<&ProxyConfig>) -> Result<Client> {
        let mut builder = Client::builder()
            .user_agent(&self.user_agent)
            .default_headers(self.headers())
            .timeout(self.timeout);

        builder = match proxy {
            Some(proxy) => builder.proxy(proxy.to_reqwest()?),
            None => builder.no_proxy(),
        };

        Ok(builder.build()?)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("host", &self.host)
            .field("user_agent", &self.user_agent)
            .field("authenticated", &self.is_authenticated())
            .field("timeout", &self.timeout)
            .finish()
    }
}
