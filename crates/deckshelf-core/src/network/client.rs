//! HTTP client wrapper.
//!
//! Provides a wrapper around reqwest with:
//! - A configured request timeout
//! - User-agent management
//! - Status checking that maps failures to [`ShelfError`]

use crate::config::NetworkConfig;
use crate::{Result, ShelfError};
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tracing::debug;

/// HTTP client used for artwork downloads.
pub struct HttpClient {
    client: Client,
    default_timeout: Duration,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration.
    pub fn new() -> Result<Self> {
        Self::with_timeout(NetworkConfig::REQUEST_TIMEOUT)
    }

    /// Create a new HTTP client with a custom default timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(NetworkConfig::USER_AGENT)
            .build()
            .map_err(|e| ShelfError::Network {
                message: format!("Failed to create HTTP client: {}", e),
                source: Some(e),
            })?;

        Ok(Self {
            client,
            default_timeout: timeout,
        })
    }

    /// Get the configured request timeout.
    pub fn timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Make a GET request.
    ///
    /// Non-success statuses are returned as [`ShelfError::DownloadFailed`].
    pub async fn get(&self, url: &str) -> Result<Response> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ShelfError::Network {
                message: format!("GET {} failed: {}", url, e),
                source: Some(e),
            })?;

        Self::check_response_status(response, url)
    }

    fn check_response_status(response: Response, url: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        Err(ShelfError::DownloadFailed {
            url: url.to_string(),
            message: Self::describe_status(status),
        })
    }

    fn describe_status(status: StatusCode) -> String {
        match status.canonical_reason() {
            Some(reason) => format!("HTTP {} {}", status.as_u16(), reason),
            None => format!("HTTP {}", status.as_u16()),
        }
    }
}
