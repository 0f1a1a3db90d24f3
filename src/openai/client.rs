use std::env;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use super::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use crate::http::{ApiKey, snippet};

const API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, thiserror::Error)]
pub enum OpenAiError {
    #[error("Missing OPENAI_API_KEY")]
    ApiKeyNotSet,

    #[error("OpenAI {code}: {message}")]
    Api { code: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Single-prompt text generation.
/// Implemented by `OpenAiClient` for production; mock implementations used in tests.
pub trait TextGenerator {
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String, OpenAiError>;
}

#[derive(Clone)]
pub struct OpenAiClient {
    http: Client,
    api_key: ApiKey,
    model: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn from_env(http: Client) -> Result<Self, OpenAiError> {
        let api_key = ApiKey::from_env("OPENAI_API_KEY").ok_or(OpenAiError::ApiKeyNotSet)?;
        let model = env::var("OPENAI_MODEL")
            .ok()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        Ok(Self {
            http,
            api_key,
            model,
            base_url: API_BASE.to_string(),
        })
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            http,
            api_key: ApiKey::new("test-key").expect("non-empty test key"),
            model: DEFAULT_MODEL.to_string(),
            base_url: base_url.to_string(),
        }
    }
}

impl TextGenerator for OpenAiClient {
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String, OpenAiError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature,
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.api_key.expose())
            .json(&request)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = if text.is_empty() {
                status.canonical_reason().unwrap_or_default().to_string()
            } else {
                snippet(&text)
            };
            warn!(status = %status, "OpenAI API error");
            return Err(OpenAiError::Api {
                code: status.as_u16(),
                message,
            });
        }

        let body: ChatCompletionResponse = response.json().await?;
        debug!(model = %self.model, "chat completion complete");
        Ok(body.first_text())
    }
}

#[cfg(test)]
mod http_tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn generate_posts_chat_completion() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-4o-mini",
                "temperature": 0.5,
                "messages": [{"role": "user", "content": "Say hi"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": " Hi! "}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenAiClient::with_base_url(Client::new(), &server.uri());
        let text = client.generate("Say hi", 0.5).await.unwrap();
        assert_eq!(text, "Hi!");
    }

    #[tokio::test]
    async fn generate_non_success_carries_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("Rate limit reached"))
            .mount(&server)
            .await;

        let client = OpenAiClient::with_base_url(Client::new(), &server.uri());
        let err = client.generate("Say hi", 0.7).await.unwrap_err();
        assert_eq!(err.to_string(), "OpenAI 429: Rate limit reached");
    }

    #[tokio::test]
    async fn generate_empty_error_body_uses_reason_phrase() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = OpenAiClient::with_base_url(Client::new(), &server.uri());
        let err = client.generate("Say hi", 0.7).await.unwrap_err();
        assert_eq!(err.to_string(), "OpenAI 503: Service Unavailable");
    }
}
