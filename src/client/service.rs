//! Q&A and health endpoints
//!
//! `POST /ask` answers a free-text question from the API's prepared data
//! context; `GET /health` reports what the server has available.

use serde::{Deserialize, Serialize};

use super::error::{api_error_message, FetchError};
use super::source::ApiClient;

pub const ASK_PATH: &str = "/ask";
pub const HEALTH_PATH: &str = "/health";

#[derive(Debug, Serialize)]
struct AskRequest<'a> {
    query: &'a str,
}

#[derive(Debug, Deserialize)]
struct AskResponse {
    answer: String,
}

/// Server readiness as reported by `GET /health`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiHealth {
    pub status: String,
    /// Cleaned IPO dataset is present
    pub has_data: bool,
    /// Priority scores have been trained
    pub has_priority: bool,
    /// The Q&A data context has been built
    pub has_context: bool,
    pub model: Option<String>,
    /// A model API key is configured
    pub key_present: bool,
}

impl ApiHealth {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }

    /// Whether `/ask` can be expected to answer
    pub fn can_answer(&self) -> bool {
        self.has_context && self.key_present
    }
}

impl ApiClient {
    /// Ask the API a question about the loaded IPO data.
    ///
    /// Blank questions are rejected without a request.
    pub async fn ask(&self, query: &str) -> Result<String, FetchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(FetchError::EmptyQuery);
        }

        let url = self.url(ASK_PATH);
        tracing::debug!(url = %url, "POST");

        let response = self
            .client
            .post(&url)
            .json(&AskRequest { query })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                message: api_error_message(&text),
            });
        }

        let body = response.bytes().await?;
        let parsed: AskResponse = serde_json::from_slice(&body)?;
        tracing::info!(chars = parsed.answer.len(), "Answer received");
        Ok(parsed.answer)
    }

    /// Fetch server readiness
    pub async fn health(&self) -> Result<ApiHealth, FetchError> {
        let url = self.url(HEALTH_PATH);
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
