use serde::{Deserialize, Serialize};

/// One organic result as returned by the search provider, in rank order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub position: u32,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

/// A map listing from the local pack shown alongside organic results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalPackResult {
    pub position: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<u64>,
}

/// A validated rank-check request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankQuery {
    pub keyword: String,
    pub domain: String,
    pub location: Option<String>,
    pub country_code: String,
    pub language_code: String,
    #[serde(skip)]
    pub include_local_pack: bool,
}

/// First result that belongs to the target domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankMatch<'a> {
    pub position: u32,
    pub link: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Placement {
    pub in_top3: bool,
    pub in_top10: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankOutcome {
    /// `None` when the domain is absent from the fetched results.
    pub position: Option<u32>,
    pub matched_link: Option<String>,
    pub in_top3: bool,
    pub in_top10: bool,
    pub top3: Vec<SearchResult>,
    pub top10: Vec<SearchResult>,
    /// Omitted unless the local pack was requested; `Some(None)` serializes as `null`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_pack_match: Option<Option<LocalPackResult>>,
}
