use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::http::{ApiKey, error_message};

const API_BASE: &str = "https://api.resend.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("RESEND_API_KEY missing")]
    ApiKeyNotSet,

    #[error("{message}")]
    Api { code: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Serialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    id: Option<String>,
}

/// Transactional email delivery.
/// Implemented by `ResendClient` for production; mock implementations used in tests.
pub trait Mailer {
    /// Returns the provider's message id when it reports one.
    async fn send(&self, email: &OutgoingEmail) -> Result<Option<String>, EmailError>;
}

#[derive(Clone)]
pub struct ResendClient {
    http: Client,
    api_key: ApiKey,
    base_url: String,
}

impl ResendClient {
    pub fn from_env(http: Client) -> Result<Self, EmailError> {
        let api_key = ApiKey::from_env("RESEND_API_KEY").ok_or(EmailError::ApiKeyNotSet)?;
        Ok(Self {
            http,
            api_key,
            base_url: API_BASE.to_string(),
        })
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            http,
            api_key: ApiKey::new("re_test_key").expect("non-empty test key"),
            base_url: base_url.to_string(),
        }
    }

    pub fn key_prefix(&self) -> String {
        self.api_key.prefix()
    }
}

impl Mailer for ResendClient {
    async fn send(&self, email: &OutgoingEmail) -> Result<Option<String>, EmailError> {
        let url = format!("{}/emails", self.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(self.api_key.expose())
            .json(email)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = error_message(&response.text().await.unwrap_or_default());
            warn!(status = %status, error = %message, "Resend API error");
            return Err(EmailError::Api {
                code: status.as_u16(),
                message,
            });
        }

        let body: SendResponse = response.json().await?;
        debug!(id = ?body.id, "email accepted");
        Ok(body.id)
    }
}
