use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use super::types::{CheckoutRequest, CheckoutSession};
use crate::http::{ApiKey, error_message};

const API_BASE: &str = "https://api.stripe.com/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, thiserror::Error)]
pub enum StripeError {
    #[error("Missing STRIPE_SECRET_KEY")]
    ApiKeyNotSet,

    #[error("Stripe session has no checkout URL")]
    MissingUrl,

    #[error("{message}")]
    Api { code: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

#[derive(Clone)]
pub struct StripeClient {
    http: Client,
    secret_key: ApiKey,
    base_url: String,
}

impl StripeClient {
    pub fn from_env(http: Client) -> Result<Self, StripeError> {
        let secret_key = ApiKey::from_env("STRIPE_SECRET_KEY").ok_or(StripeError::ApiKeyNotSet)?;
        Ok(Self {
            http,
            secret_key,
            base_url: API_BASE.to_string(),
        })
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            http,
            secret_key: ApiKey::new("sk_test_key").expect("non-empty test key"),
            base_url: base_url.to_string(),
        }
    }

    /// Creates a one-item subscription Checkout session and returns its hosted URL.
    pub async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<String, StripeError> {
        let url = format!("{}/checkout/sessions", self.base_url);
        let form = [
            ("mode", "subscription".to_string()),
            ("line_items[0][price]", request.price_id.clone()),
            ("line_items[0][quantity]", "1".to_string()),
            ("success_url", request.success_url()),
            ("cancel_url", request.cancel_url()),
            ("allow_promotion_codes", "true".to_string()),
            ("billing_address_collection", "auto".to_string()),
        ];

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.secret_key.expose())
            .form(&form)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = error_message(&response.text().await.unwrap_or_default());
            warn!(status = %status, tier = %request.tier, "Stripe API error");
            return Err(StripeError::Api {
                code: status.as_u16(),
                message,
            });
        }

        let session: CheckoutSession = response.json().await?;
        debug!(session = %session.id, tier = %request.tier, "checkout session created");
        session.url.ok_or(StripeError::MissingUrl)
    }
}
