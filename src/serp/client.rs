use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use super::types::{SerpRequest, SerpResponse};
use crate::http::{ApiKey, error_message};

const API_BASE: &str = "https://serpapi.com/search.json";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);
/// Fetch 20 results so a domain just outside the top 10 is still located.
const RESULTS_PER_PAGE: &str = "20";
const GOOGLE_DOMAIN: &str = "google.com";
/// SerpApi reports a valid but empty page through its `error` field.
const EMPTY_RESULTS_NOTICE: &str = "hasn't returned any results";

#[derive(Debug, thiserror::Error)]
pub enum SerpError {
    #[error("Missing SERP_API_KEY env var on server.")]
    ApiKeyNotSet,

    #[error("{message}")]
    Api { code: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),
}

// The request URL carries `api_key`, so it never reaches the message.
impl From<reqwest::Error> for SerpError {
    fn from(e: reqwest::Error) -> Self {
        SerpError::Network(e.without_url())
    }
}

/// Source of search engine result pages.
/// Implemented by `SerpClient` for production; mock implementations used in tests.
pub trait SerpSource {
    async fn search(&self, request: &SerpRequest) -> Result<SerpResponse, SerpError>;
}

#[derive(Clone)]
pub struct SerpClient {
    http: Client,
    api_key: ApiKey,
    base_url: String,
}

impl SerpClient {
    pub fn from_env(http: Client) -> Result<Self, SerpError> {
        let api_key = ApiKey::from_env("SERP_API_KEY").ok_or(SerpError::ApiKeyNotSet)?;
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
            api_key: ApiKey::new("test-key").expect("non-empty test key"),
            base_url: format!("{base_url}/search.json"),
        }
    }

    fn query_params<'a>(&'a self, request: &'a SerpRequest) -> Vec<(&'static str, &'a str)> {
        let mut params = vec![
            ("engine", "google"),
            ("q", request.keyword.as_str()),
            ("api_key", self.api_key.expose()),
            ("google_domain", GOOGLE_DOMAIN),
            ("gl", request.country_code.as_str()),
            ("hl", request.language_code.as_str()),
            ("num", RESULTS_PER_PAGE),
        ];
        if let Some(location) = request.location.as_deref() {
            params.push(("location", location));
        }
        params
    }
}

impl SerpSource for SerpClient {
    async fn search(&self, request: &SerpRequest) -> Result<SerpResponse, SerpError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&self.query_params(request))
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = format!("HTTP {}: {}", status.as_u16(), error_message(&text));
            warn!(status = %status, "SerpApi error");
            return Err(SerpError::Api {
                code: status.as_u16(),
                message,
            });
        }

        let mut body: SerpResponse = response.json().await?;
        if let Some(err) = body.error.take() {
            if err.contains(EMPTY_RESULTS_NOTICE) {
                debug!(keyword = %request.keyword, "SerpApi returned an empty results page");
                return Ok(SerpResponse::default());
            }
            warn!(error = %err, "SerpApi error in 200 response");
            return Err(SerpError::Api {
                code: status.as_u16(),
                message: err,
            });
        }

        debug!(
            keyword = %request.keyword,
            organic = body.organic_results.as_ref().map_or(0, Vec::len),
            "serp lookup complete"
        );
        Ok(body)
    }
}

#[cfg(test)]
mod http_tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request(location: Option<&str>) -> SerpRequest {
        SerpRequest {
            keyword: "plumber near me".into(),
            location: location.map(str::to_string),
            country_code: "us".into(),
            language_code: "en".into(),
        }
    }

    #[tokio::test]
    async fn search_sends_expected_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search.json"))
            .and(query_param("engine", "google"))
            .and(query_param("q", "plumber near me"))
            .and(query_param("api_key", "test-key"))
            .and(query_param("num", "20"))
            .and(query_param("gl", "us"))
            .and(query_param("hl", "en"))
            .and(query_param("location", "Austin, Texas, United States"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "organic_results": [
                    {"position": 1, "link": "https://a.com", "title": "A"},
                    {"position": 2, "link": "https://example.com", "title": "Example", "snippet": "hi"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = SerpClient::with_base_url(Client::new(), &server.uri());
        let body = client
            .search(&request(Some("Austin, Texas, United States")))
            .await
            .unwrap();

        let organic = body.organic_results.unwrap();
        assert_eq!(organic.len(), 2);
        assert_eq!(organic[1].snippet.as_deref(), Some("hi"));
    }

    #[tokio::test]
    async fn search_non_success_passes_status_through() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search.json"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(serde_json::json!({"error": "Invalid API key."})),
            )
            .mount(&server)
            .await;

        let client = SerpClient::with_base_url(Client::new(), &server.uri());
        match client.search(&request(None)).await {
            Err(SerpError::Api { code: 401, message }) => {
                assert_eq!(message, "HTTP 401: Invalid API key.");
            }
            other => panic!("expected Api(401), got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn search_error_field_in_200_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"error": "Unsupported `location` parameter."})),
            )
            .mount(&server)
            .await;

        let client = SerpClient::with_base_url(Client::new(), &server.uri());
        let err = client.search(&request(Some("Nowhere"))).await.unwrap_err();
        assert!(err.to_string().contains("Unsupported"));
    }

    #[tokio::test]
    async fn search_empty_results_notice_is_empty_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "error": "Google hasn't returned any results for this query."
            })))
            .mount(&server)
            .await;

        let client = SerpClient::with_base_url(Client::new(), &server.uri());
        let body = client.search(&request(None)).await.unwrap();
        assert!(body.organic_results.is_none());
    }

    #[tokio::test]
    async fn search_undecodable_body_hides_api_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = SerpClient::with_base_url(Client::new(), &server.uri());
        let err = client.search(&request(None)).await.unwrap_err();
        assert!(matches!(err, SerpError::Network(_)));
        let message = err.to_string();
        assert!(!message.contains("api_key"), "{message}");
        assert!(!message.contains("test-key"), "{message}");
    }

    #[tokio::test]
    async fn search_connection_failure_hides_api_key() {
        let client = SerpClient::with_base_url(Client::new(), "http://127.0.0.1:1");
        let err = client.search(&request(None)).await.unwrap_err();
        assert!(matches!(err, SerpError::Network(_)));
        assert!(!err.to_string().contains("test-key"));
    }
}
