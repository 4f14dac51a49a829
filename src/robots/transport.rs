//! Transports used to download robots.txt

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Why a robots.txt download failed
///
/// Only [`TransportError::Timeout`] is worth retrying; everything else means
/// the current protocol is abandoned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("{0}")]
    Failed(String),
}

/// Something that can GET a robots.txt URL and return its body
#[async_trait]
pub trait RobotsTransport: Send + Sync {
    async fn get(&self, url: &str) -> Result<String, TransportError>;
}

/// Production transport backed by the shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpRobotsTransport {
    client: Client,
    timeout: Duration,
}

impl HttpRobotsTransport {
    /// # Arguments
    ///
    /// * `client` - Shared HTTP client (carries the User-Agent header)
    /// * `timeout` - Per-request timeout; expiring it counts as a retryable timeout
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

#[async_trait]
impl RobotsTransport for HttpRobotsTransport {
    async fn get(&self, url: &str) -> Result<String, TransportError> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Failed(format!("HTTP {}", status.as_u16())));
        }

        response.text().await.map_err(classify)
    }
}

fn classify(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Failed(error.to_string())
    }
}
