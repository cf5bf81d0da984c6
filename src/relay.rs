//! Second-hop client for the upstream record API.
//!
//! Forwards normalized submissions and translates the upstream response into
//! either the raw JSON body (2xx) or a [`RelayError`].

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

pub const MOOD_ENDPOINT: &str = "/api/mood/entry";
pub const JOURNAL_ENDPOINT: &str = "/api/journal/entry";
pub const HEALTH_ENDPOINT: &str = "/health";

const UPSTREAM_FAILURE_MESSAGE: &str = "The upstream record service returned an error";

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Upstream error {status}: {message}")]
    Upstream {
        status: u16,
        message: String,
        data: Option<Value>,
    },

    #[error("Could not reach upstream: {0}")]
    Network(String),

    #[error("Unexpected upstream payload: {0}")]
    UnexpectedPayload(String),
}

impl From<reqwest::Error> for RelayError {
    fn from(e: reqwest::Error) -> Self {
        RelayError::Network(e.to_string())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayMoodBody {
    pub user_id: String,
    pub mood_id: i32,
    pub stress_level: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayJournalBody {
    pub user_id: String,
    pub prompt_id: String,
    pub answer: String,
}

#[derive(Clone)]
pub struct RelayClient {
    client: reqwest::Client,
    base_url: String,
}

impl RelayClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RelayError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn save_mood_entry(&self, body: &RelayMoodBody) -> Result<Value, RelayError> {
        self.forward(MOOD_ENDPOINT, body).await
    }

    pub async fn save_journal_entry(&self, body: &RelayJournalBody) -> Result<Value, RelayError> {
        self.forward(JOURNAL_ENDPOINT, body).await
    }

    /// POST `body` to `endpoint` and return the upstream JSON on 2xx.
    ///
    /// A body that is not JSON is reported as a network failure, like an
    /// unreachable host.
    pub async fn forward<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<Value, RelayError> {
        let url = format!("{}{}", self.base_url, endpoint);
        tracing::debug!(endpoint = %endpoint, "Forwarding record to upstream");

        let response = self.client.post(&url).json(body).send().await?;

        let status = response.status();
        let result: Value = response.json().await?;

        tracing::debug!(endpoint = %endpoint, status = status.as_u16(), "Upstream responded");

        if !status.is_success() {
            let message = result
                .get("message")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .unwrap_or(UPSTREAM_FAILURE_MESSAGE)
                .to_string();

            return Err(RelayError::Upstream {
                status: status.as_u16(),
                message,
                data: result.get("data").cloned(),
            });
        }

        Ok(result)
    }

    /// Unauthenticated GET against the upstream health endpoint.
    ///
    /// `Ok(false)` when upstream answers with a non-2xx status, `Err` when it
    /// cannot be reached at all.
    pub async fn is_reachable(&self) -> Result<bool, RelayError> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, HEALTH_ENDPOINT))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        tracing::info!(status = response.status().as_u16(), "Upstream health check");

        Ok(response.status().is_success())
    }
}
