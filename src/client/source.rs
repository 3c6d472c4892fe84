//! Data sources
//!
//! The loader reads JSON documents through [`DataSource`]. [`ApiClient`] is
//! the HTTP implementation against the dashboard API.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::error::{api_error_message, FetchError};
use crate::config::ApiConfig;

/// Something that can answer `GET {path}` with a JSON document
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch and decode the JSON document at `path` (e.g. `/context`)
    async fn get_json(&self, path: &str) -> Result<Value, FetchError>;
}

/// HTTP client for the IPO analytics API
#[derive(Debug, Clone)]
pub struct ApiClient {
    pub(super) client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the configured API
    pub fn new(config: &ApiConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| FetchError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(super) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl DataSource for ApiClient {
    async fn get_json(&self, path: &str) -> Result<Value, FetchError> {
        let url = self.url(path);
        tracing::debug!(url = %url, "GET");

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                message: api_error_message(&text),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
