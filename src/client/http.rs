//! Analytics Backend REST Client
//!
//! HTTP client for the three analytics endpoints the dashboard consumes.

use reqwest::{Client, Response};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use super::dto::{Overview, TrackEvent, UserProfile};

/// Analytics backend REST client
#[derive(Debug, Clone)]
pub struct AnalyticsClient {
    client: Client,
    config: ClientConfig,
}

/// Configuration for the analytics client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL for the backend (e.g., "http://localhost:8000")
    pub base_url: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            request_timeout_ms: 30_000,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

impl AnalyticsClient {
    /// Create a new analytics client with the given configuration
    pub fn new(mut config: ClientConfig) -> Result<Self, ClientError> {
        config.base_url = config.base_url.trim_end_matches('/').to_string();

        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(ClientError::Request)?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Submit a demographic profile for an identifier
    pub async fn identify(&self, profile: &UserProfile) -> Result<(), ClientError> {
        self.send_post(&self.url("/analytics/user"), profile).await
    }

    /// Submit a single tracked event
    pub async fn track(&self, event: &TrackEvent) -> Result<(), ClientError> {
        self.send_post(&self.url("/analytics/track"), event).await
    }

    /// Fetch the aggregated analytics snapshot
    pub async fn fetch_overview(&self) -> Result<Overview, ClientError> {
        let response = self
            .client
            .get(self.url("/analytics/overview"))
            .send()
            .await
            .map_err(classify)?;

        let response = check_status(response).await?;
        let body = response.text().await.map_err(classify)?;
        serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// Send a JSON POST; the response body is ignored
    async fn send_post<T: Serialize>(&self, url: &str, body: &T) -> Result<(), ClientError> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(classify)?;

        check_status(response).await?;
        Ok(())
    }
}

fn classify(e: reqwest::Error) -> ClientError {
    if e.is_timeout() {
        ClientError::Timeout
    } else if e.is_connect() {
        ClientError::Unavailable
    } else {
        ClientError::Request(e)
    }
}

async fn check_status(response: Response) -> Result<Response, ClientError> {
    if response.status().is_success() {
        Ok(response)
    } else {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        Err(ClientError::Api {
            status: status.as_u16(),
            message: text,
        })
    }
}

// ============================================
// Errors
// ============================================

/// Errors that can occur when talking to the analytics backend
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Analytics backend unavailable")]
    Unavailable,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Request timeout")]
    Timeout,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.request_timeout_ms, 30_000);
    }

    #[test]
    fn test_urls_trim_trailing_slash() {
        let client = AnalyticsClient::new(ClientConfig::new("http://analytics.test/")).unwrap();
        assert_eq!(client.config().base_url, "http://analytics.test");
        assert_eq!(
            client.url("/analytics/overview"),
            "http://analytics.test/analytics/overview"
        );
    }

    #[test]
    fn test_error_display() {
        let err = ClientError::Api {
            status: 503,
            message: "down".to_string(),
        };
        assert_eq!(err.to_string(), "API error 503: down");
        assert_eq!(ClientError::Unavailable.to_string(), "Analytics backend unavailable");
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        // Port 9 (discard) on loopback is essentially never listening
        let client = AnalyticsClient::new(ClientConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            request_timeout_ms: 2_000,
        })
        .unwrap();

        let err = client.fetch_overview().await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Unavailable | ClientError::Timeout | ClientError::Request(_)
        ));
    }
}
