mod ai;
mod checkout;
mod errors;
mod misc;
mod params;
mod rank;
mod report;

pub use errors::ApiError;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use reqwest::Client;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, warn};

use errors::{email_to_api_error, openai_to_api_error, serp_to_api_error, stripe_to_api_error};

use crate::config::Settings;
use crate::email::{EmailError, ResendClient};
use crate::openai::{OpenAiClient, OpenAiError};
use crate::serp::{SerpClient, SerpError};
use crate::stripe::{StripeClient, StripeError};

/// Shared handler state.
///
/// Each provider client is optional: a missing credential disables only the
/// endpoints that need it, and those report the missing variable per request.
/// - `SERP_API_KEY`: rank checks
/// - `OPENAI_API_KEY`: post and reply drafts
/// - `STRIPE_SECRET_KEY`: checkout sessions
/// - `RESEND_API_KEY`: report email
#[derive(Clone)]
pub struct AppState {
    serp: Option<SerpClient>,
    openai: Option<OpenAiClient>,
    stripe: Option<StripeClient>,
    resend: Option<ResendClient>,
    settings: Arc<Settings>,
}

impl AppState {
    pub fn from_env(http: Client, settings: Settings) -> Self {
        let serp = SerpClient::from_env(http.clone())
            .inspect_err(|e| warn!("SerpApi client not available: {e}"))
            .ok();
        let openai = OpenAiClient::from_env(http.clone())
            .inspect_err(|e| warn!("OpenAI client not available: {e}"))
            .ok();
        let stripe = StripeClient::from_env(http.clone())
            .inspect_err(|e| warn!("Stripe client not available: {e}"))
            .ok();
        let resend = ResendClient::from_env(http)
            .inspect_err(|e| warn!("Resend client not available: {e}"))
            .ok();
        Self {
            serp,
            openai,
            stripe,
            resend,
            settings: Arc::new(settings),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn serp(&self) -> Result<&SerpClient, ApiError> {
        self.serp
            .as_ref()
            .ok_or_else(|| serp_to_api_error(SerpError::ApiKeyNotSet))
    }

    fn openai(&self) -> Result<&OpenAiClient, ApiError> {
        self.openai
            .as_ref()
            .ok_or_else(|| openai_to_api_error(OpenAiError::ApiKeyNotSet))
    }

    fn stripe(&self) -> Result<&StripeClient, ApiError> {
        self.stripe
            .as_ref()
            .ok_or_else(|| stripe_to_api_error(StripeError::ApiKeyNotSet))
    }

    fn resend(&self) -> Result<&ResendClient, ApiError> {
        self.resend
            .as_ref()
            .ok_or_else(|| email_to_api_error(EmailError::ApiKeyNotSet))
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(misc::health))
        .route("/api/hello", get(misc::hello))
        .route("/api/debug/env", get(misc::debug_env))
        .route("/api/rank/check", get(rank::usage).post(rank::check))
        .route("/api/ai/draft-post", post(ai::draft_post))
        .route("/api/ai/draft-reply", post(ai::draft_reply))
        .route("/api/checkout/session", post(checkout::create_session))
        .route("/api/report/send", post(report::send))
        .route("/api/report/test", get(report::send_test))
        .route(
            "/api/report/batch",
            get(report::batch_scheduled).post(report::batch_manual),
        )
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    pub fn settings(pairs: &[(&str, &str)]) -> Settings {
        let pairs: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        })
        .unwrap()
    }

    /// State with every provider disabled; tests switch on what they need.
    pub fn state(settings: Settings) -> AppState {
        AppState {
            serp: None,
            openai: None,
            stripe: None,
            resend: None,
            settings: Arc::new(settings),
        }
    }

    pub fn with_serp(mut state: AppState, base_url: &str) -> AppState {
        state.serp = Some(SerpClient::with_base_url(Client::new(), base_url));
        state
    }

    pub fn with_openai(mut state: AppState, base_url: &str) -> AppState {
        state.openai = Some(OpenAiClient::with_base_url(Client::new(), base_url));
        state
    }

    pub fn with_stripe(mut state: AppState, base_url: &str) -> AppState {
        state.stripe = Some(StripeClient::with_base_url(Client::new(), base_url));
        state
    }

    pub fn with_resend(mut state: AppState, base_url: &str) -> AppState {
        state.resend = Some(ResendClient::with_base_url(Client::new(), base_url));
        state
    }

    pub fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub async fn call(state: AppState, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = router(state).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }
}
