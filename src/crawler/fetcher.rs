//! HTTP fetcher implementation
//!
//! This module defines the transport seam of the crawler and its production
//! implementation:
//! - `Fetcher`: one blocking `fetch(url)` per call, owned by a single worker
//! - `FetcherFactory`: builds one `Fetcher` per worker thread
//! - `HttpFetcher`: `reqwest::blocking` client with user agent, connect and
//!   request timeouts, and a bounded redirect policy

use crate::config::{HttpConfig, UserAgentConfig};
use crate::FetchError;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use std::time::Duration;

/// A fetched response, before any HTML processing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// Final URL after redirects
    pub final_url: String,
    /// HTTP status code
    pub status_code: u16,
    /// Content-Type header value, if any
    pub content_type: Option<String>,
    /// Response body
    pub body: String,
}

impl FetchResponse {
    /// Returns true for 2xx statuses
    pub fn is_success(&self) -> bool {
        is_success_status(self.status_code)
    }

    /// Returns true when the Content-Type names `text/html`
    pub fn is_html(&self) -> bool {
        is_html_content_type(self.content_type.as_deref())
    }
}

fn is_success_status(status_code: u16) -> bool {
    (200..300).contains(&status_code)
}

fn is_html_content_type(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.to_ascii_lowercase().contains("text/html"))
}

/// A 2xx HTML response; anything else is classified without reading the body
fn is_crawlable(status_code: u16, content_type: Option<&str>) -> bool {
    is_success_status(status_code) && is_html_content_type(content_type)
}

/// Retrieves one URL
///
/// Implementations apply their own timeouts and redirect policy. Failures are
/// returned, never panicked.
pub trait Fetcher {
    fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError>;
}

/// Builds the per-worker [`Fetcher`]
///
/// A failure here takes only the calling worker out of the pool.
pub trait FetcherFactory: Sync {
    fn create(&self, worker_id: usize) -> Result<Box<dyn Fetcher>, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use tidewalk::config::{HttpConfig, UserAgentConfig};
/// use tidewalk::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default(), &UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    http: &HttpConfig,
    user_agent: &UserAgentConfig,
) -> Result<Client, FetchError> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(http.request_timeout_secs))
        .connect_timeout(Duration::from_secs(http.connect_timeout_secs))
        .redirect(Policy::limited(http.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
        .map_err(FetchError::ClientBuild)
}

/// `reqwest`-backed fetcher, one per worker thread
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError> {
        let response = self.client.get(url).send().map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Transport {
                    url: url.to_string(),
                    source: e,
                }
            }
        })?;

        let status_code = response.status().as_u16();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        // Skip downloading bodies that will never be parsed
        let body = if is_crawlable(status_code, content_type.as_deref()) {
            response.text().map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout {
                        url: url.to_string(),
                    }
                } else {
                    FetchError::Body {
                        url: url.to_string(),
                        source: e,
                    }
                }
            })?
        } else {
            String::new()
        };

        Ok(FetchResponse {
            final_url,
            status_code,
            content_type,
            body,
        })
    }
}

/// Builds one [`HttpFetcher`] per worker from the HTTP and user agent config
#[derive(Debug, Clone, Default)]
pub struct HttpFetcherFactory {
    http: HttpConfig,
    user_agent: UserAgentConfig,
}

impl HttpFetcherFactory {
    pub fn new(http: HttpConfig, user_agent: UserAgentConfig) -> Self {
        Self { http, user_agent }
    }
}

impl FetcherFactory for HttpFetcherFactory {
    fn create(&self, worker_id: usize) -> Result<Box<dyn Fetcher>, FetchError> {
        let client = build_http_client(&self.http, &self.user_agent)?;
        tracing::trace!("Worker [{}] built HTTP client", worker_id);
        Ok(Box::new(HttpFetcher::new(client)))
    }
}
