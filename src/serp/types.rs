use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

use crate::rank::{LocalPackResult, RankQuery, SearchResult};

/// Parameters for one Google results page lookup.
#[derive(Debug, Clone)]
pub struct SerpRequest {
    pub keyword: String,
    pub location: Option<String>,
    pub country_code: String,
    pub language_code: String,
}

impl From<&RankQuery> for SerpRequest {
    fn from(query: &RankQuery) -> Self {
        Self {
            keyword: query.keyword.clone(),
            location: query.location.clone(),
            country_code: query.country_code.clone(),
            language_code: query.language_code.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SerpResponse {
    pub error: Option<String>,
    #[serde(default, deserialize_with = "entries")]
    pub organic_results: Option<Vec<SearchResult>>,
    /// The local pack arrives either as a bare list or wrapped in `places`.
    #[serde(default, deserialize_with = "local_pack")]
    pub local_results: Option<Vec<LocalPackResult>>,
}

fn entries<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.map(|value| match value {
        Value::Array(items) => parse_entries(items),
        _ => Vec::new(),
    }))
}

fn local_pack<'de, D>(deserializer: D) -> Result<Option<Vec<LocalPackResult>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.map(|value| match value {
        Value::Array(items) => parse_entries(items),
        Value::Object(mut map) => match map.remove("places") {
            Some(Value::Array(items)) => parse_entries(items),
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }))
}

/// Keeps the entries that parse; a malformed listing never sinks the page.
fn parse_entries<T: DeserializeOwned>(items: Vec<Value>) -> Vec<T> {
    let total = items.len();
    let parsed: Vec<T> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();
    if parsed.len() < total {
        debug!(dropped = total - parsed.len(), "skipped malformed SerpApi entries");
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_results_accepts_both_shapes() {
        let list: SerpResponse = serde_json::from_value(serde_json::json!({
            "local_results": [{"position": 1, "title": "Cafe", "website": "https://cafe.com"}]
        }))
        .unwrap();
        let nested: SerpResponse = serde_json::from_value(serde_json::json!({
            "local_results": {"places": [{"position": 1, "title": "Cafe", "rating": 4.7, "reviews": 88}]}
        }))
        .unwrap();

        let list = list.local_results.unwrap();
        let nested = nested.local_results.unwrap();
        assert_eq!(list[0].website.as_deref(), Some("https://cafe.com"));
        assert_eq!(nested[0].reviews, Some(88));
    }

    #[test]
    fn organic_result_without_link_defaults_to_empty() {
        let resp: SerpResponse = serde_json::from_value(serde_json::json!({
            "organic_results": [{"position": 1, "title": "No link"}]
        }))
        .unwrap();
        assert_eq!(resp.organic_results.unwrap()[0].link, "");
    }

    #[test]
    fn malformed_entries_are_dropped() {
        let resp: SerpResponse = serde_json::from_value(serde_json::json!({
            "organic_results": [
                {"title": "No position"},
                {"position": 2, "link": "https://example.com", "title": "Example"}
            ],
            "local_results": [
                {"title": "Cafe", "website": "https://x.com"},
                {"position": 2, "title": "Bakery", "rating": "high"},
                {"position": 3, "title": "Deli"}
            ]
        }))
        .unwrap();

        let organic = resp.organic_results.unwrap();
        assert_eq!(organic.len(), 1);
        assert_eq!(organic[0].position, 2);
        let local = resp.local_results.unwrap();
        assert_eq!(local.len(), 1);
        assert_eq!(local[0].title, "Deli");
    }

    #[test]
    fn unexpected_local_shape_is_empty() {
        let resp: SerpResponse = serde_json::from_value(serde_json::json!({
            "local_results": {"more_locations_link": "https://google.com"}
        }))
        .unwrap();
        assert_eq!(resp.local_results, Some(Vec::new()));
    }
}
