//! Client for the hosted auth provider's session endpoints.

use std::time::Duration;

use crate::config::Config;

pub const LOGOUT_PATH: &str = "/auth/v1/logout";

#[derive(Debug, thiserror::Error)]
pub enum AuthProviderError {
    #[error("Auth provider is not configured")]
    NotConfigured,

    #[error("Auth provider rejected sign-out ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Could not reach auth provider: {0}")]
    Network(#[from] reqwest::Error),
}

#[derive(Clone)]
pub struct AuthProvider {
    client: reqwest::Client,
    base_url: Option<String>,
    api_key: String,
}

impl AuthProvider {
    pub fn new(config: &Config) -> Result<Self, AuthProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.relay_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config
                .auth_url
                .as_deref()
                .map(|url| url.trim_end_matches('/').to_string()),
            api_key: config.auth_api_key.clone(),
        })
    }

    /// Revoke `access_token` at the provider
    pub async fn sign_out(&self, access_token: &str) -> Result<(), AuthProviderError> {
        let base_url = self
            .base_url
            .as_deref()
            .ok_or(AuthProviderError::NotConfigured)?;

        let response = self
            .client
            .post(format!("{base_url}{LOGOUT_PATH}"))
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let message = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| {
                ["msg", "message", "error_description", "error"]
                    .iter()
                    .find_map(|key| body.get(*key).and_then(|v| v.as_str()).map(String::from))
            })
            .unwrap_or_else(|| "Sign-out failed".to_string());

        Err(AuthProviderError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}
