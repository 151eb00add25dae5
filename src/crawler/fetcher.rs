//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the configured user agent and timeout
//! - GET requests following redirects
//! - Error classification (timeout, network, status, body)
//!
//! The [`Fetcher`] trait is the seam between the crawl engine and the network.

use crate::config::CrawlConfig;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Upper bound on the connect phase, never longer than the request timeout
const MAX_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// A successful (2xx) response
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: Url,

    /// HTTP status code
    pub status: u16,

    /// Content-Type header value, empty when absent
    pub content_type: String,

    /// Response headers
    pub headers: HeaderMap,

    /// Decoded body. Empty for non-HTML responses, which are never read.
    pub body: String,
}

impl FetchedPage {
    /// Returns true if the response declares an HTML body
    pub fn is_html(&self) -> bool {
        is_html_content_type(&self.content_type)
    }
}

/// Returns true if a Content-Type value contains `text/html`
///
/// # Examples
///
/// ```
/// use golly::crawler::is_html_content_type;
///
/// assert!(is_html_content_type("text/html; charset=utf-8"));
/// assert!(is_html_content_type("Text/HTML"));
/// assert!(!is_html_content_type("application/json"));
/// assert!(!is_html_content_type(""));
/// ```
pub fn is_html_content_type(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("text/html")
}

/// Reasons a single fetch can fail
///
/// None of these are fatal to the crawl.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to read response body: {0}")]
    Body(String),
}

/// Source of pages for the crawl engine
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url` with a single GET
    ///
    /// # Errors
    ///
    /// Returns a `FetchError` on timeout, transport failure, a non-2xx
    /// status, or an unreadable body.
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The crawl configuration (user agent and timeout are used)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use golly::config::{resolve_config, CrawlOptions};
/// use golly::crawler::build_http_client;
///
/// let config = resolve_config(CrawlOptions {
///     url: Some("https://example.com/docs/".to_string()),
///     ..Default::default()
/// })
/// .unwrap();
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &CrawlConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.timeout)
        .connect_timeout(config.timeout.min(MAX_CONNECT_TIMEOUT))
        .gzip(true)
        .brotli(true)
        .build()
}

/// `Fetcher` backed by a shared `reqwest::Client`
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    /// Creates a fetcher from the crawl configuration
    pub fn new(config: &CrawlConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
            timeout: config.timeout,
        })
    }

    fn classify(&self, error: reqwest::Error) -> FetchError {
        if error.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else if error.is_connect() {
            FetchError::Network(format!("Connection failed: {}", error))
        } else {
            FetchError::Network(error.to_string())
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let final_url = response.url().clone();
        let headers = response.headers().clone();
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let body = if is_html_content_type(&content_type) {
            response.text().await.map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout(self.timeout)
                } else {
                    FetchError::Body(e.to_string())
                }
            })?
        } else {
            String::new()
        };

        Ok(FetchedPage {
            final_url,
            status: status.as_u16(),
            content_type,
            headers,
            body,
        })
    }
}
