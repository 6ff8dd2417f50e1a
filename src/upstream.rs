//! HTTP client for the Chromium dashboard API
//!
//! Wraps reqwest with the fixed browser-like headers the dashboard requires
//! and a small retry-with-backoff envelope for transient failures.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::warn;

/// Base URL for the Chromium dashboard API
const DASHBOARD_BASE_URL: &str = "https://chromiumdash.appspot.com";

/// Total attempts per retried request, including the first
const MAX_ATTEMPTS: u32 = 3;

/// The dashboard rejects requests that don't look like they come from a browser
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Errors that can occur when talking to the dashboard
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// HTTP request failed (transport error or non-success status)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Missing expected field in response
    #[error("Missing expected field in response: {0}")]
    MissingField(String),
}

/// Client for fetching JSON from the Chromium dashboard
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http_client: Client,
    /// Base URL for the API (allows override for testing and the CLI)
    base_url: String,
}

impl UpstreamClient {
    /// Creates a client against the public Chromium dashboard
    pub fn new() -> Self {
        Self::with_base_url(DASHBOARD_BASE_URL)
    }

    /// Creates a client with a custom base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Headers sent with every request; the dashboard has been observed to
    /// reject requests without them, so they are part of the contract.
    fn request_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers
    }

    /// Duration to wait after the given failed attempt (1-based)
    fn backoff(attempt: u32) -> Duration {
        Duration::from_secs(1u64 << attempt)
    }

    /// Fetches and deserializes a JSON body, retrying transient failures
    ///
    /// Makes up to three attempts in total, sleeping `2^attempt` seconds
    /// after each failed one. Only transport and status failures are
    /// retried; a body that fails to parse will not parse differently on a
    /// second attempt. The final failure is propagated to the caller.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, UpstreamError> {
        let mut attempt = 1;
        loop {
            match self.get_json_once(path).await {
                Ok(value) => return Ok(value),
                Err(UpstreamError::Http(err)) if attempt < MAX_ATTEMPTS => {
                    warn!(path, attempt, error = %err, "upstream request failed, retrying");
                    tokio::time::sleep(Self::backoff(attempt)).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Issues a single request with no retries
    ///
    /// Used by the paginated milestone range fetch, where individual page
    /// failures are skipped rather than retried.
    pub async fn get_json_once<T: DeserializeOwned>(&self, path: &str) -> Result<T, UpstreamError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http_client
            .get(&url)
            .headers(Self::request_headers())
            .send()
            .await?
            .error_for_status()?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

impl Default for UpstreamClient {
    fn default() -> Self {
        Self::new()
    }
}
