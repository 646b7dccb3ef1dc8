//! Page fetching
//!
//! The crawl engine only sees the [`PageFetcher`] trait. [`HttpFetcher`] is
//! the production implementation: a reqwest client that can route every
//! request through a SOCKS5 proxy such as Tor.

use crate::config::{ProxyConfig, UserAgentConfig};
use crate::FetchError;
use futures::future::BoxFuture;
use reqwest::{redirect::Policy, Client, Proxy};
use std::time::Duration;

/// Maximum number of redirects followed for one fetch
const MAX_REDIRECTS: usize = 10;

/// Connect timeout; Tor circuits can take several seconds to build
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// A retrieved page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// HTTP status code
    pub status: u16,

    /// URL after redirects
    pub final_url: String,

    /// Response body
    pub body: String,
}

impl Page {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Retrieves pages for the crawler
///
/// Any HTTP response, whatever its status, is a `Page`. Only failures to get
/// a response at all are errors.
pub trait PageFetcher: Send + Sync {
    /// Fetches `url`, giving up after `timeout`
    fn fetch<'a>(&'a self, url: &'a str, timeout: Duration)
        -> BoxFuture<'a, Result<Page, FetchError>>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `proxy` - SOCKS5 proxy settings; ignored when disabled
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Invalid proxy URL or TLS backend failure
///
/// # Example
///
/// ```no_run
/// use osint_linktree::config::{ProxyConfig, UserAgentConfig};
/// use osint_linktree::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &ProxyConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    proxy: &ProxyConfig,
) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(user_agent.user_agent_string())
        .connect_timeout(CONNECT_TIMEOUT)
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true);

    if let Some(proxy_url) = proxy.proxy_url() {
        tracing::debug!("Routing requests through {}", proxy_url);
        builder = builder.proxy(Proxy::all(proxy_url)?);
    }

    builder.build()
}

/// reqwest-backed [`PageFetcher`]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with its own client
    pub fn new(user_agent: &UserAgentConfig, proxy: &ProxyConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(user_agent, proxy)?,
        })
    }

    /// Wraps an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// The underlying client, for one-off requests outside a crawl
    pub fn client(&self) -> &Client {
        &self.client
    }

    async fn get(&self, url: &str, timeout: Duration) -> Result<Page, FetchError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify_error(url, timeout, &e))?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        if final_url != url {
            tracing::debug!("{} redirected to {}", url, final_url);
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                classify_error(url, timeout, &e)
            } else {
                FetchError::Body {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        Ok(Page {
            status,
            final_url,
            body,
        })
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch<'a>(
        &'a self,
        url: &'a str,
        timeout: Duration,
    ) -> BoxFuture<'a, Result<Page, FetchError>> {
        Box::pin(self.get(url, timeout))
    }
}

/// Maps a transport error onto the fetch error taxonomy
fn classify_error(url: &str, timeout: Duration, error: &reqwest::Error) -> FetchError {
    let url = url.to_string();
    if error.is_timeout() {
        FetchError::Timeout {
            url,
            after: timeout,
        }
    } else if error.is_connect() {
        FetchError::Connect {
            url,
            message: error.to_string(),
        }
    } else {
        FetchError::Request {
            url,
            message: error.to_string(),
        }
    }
}
