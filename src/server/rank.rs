use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::Serialize;
use tracing::info;

use super::errors::{rejection_to_api_error, serp_to_api_error};
use super::params::RankCheckParams;
use super::{ApiError, AppState};
use crate::rank::engine::check_rank;
use crate::rank::{RankOutcome, RankQuery};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankCheckResponse {
    pub ok: bool,
    pub query: RankQuery,
    #[serde(flatten)]
    pub outcome: RankOutcome,
    pub debug: RankDebug,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankDebug {
    pub organic_count: usize,
    pub used_location: Option<String>,
}

pub(super) async fn usage() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "ok": true,
        "message": "POST a JSON body { keyword, domain, location?, countryCode?, languageCode?, includeLocalPack? }",
        "example": {
            "keyword": "plumber near me",
            "domain": "example.com",
            "location": "San Francisco, California, United States",
            "countryCode": "us",
            "languageCode": "en",
            "includeLocalPack": true
        }
    }))
}

pub(super) async fn check(
    State(state): State<AppState>,
    body: Result<Json<RankCheckParams>, JsonRejection>,
) -> Result<Json<RankCheckResponse>, ApiError> {
    let Json(params) = body.map_err(rejection_to_api_error)?;
    let query = params
        .into_query()
        .ok_or_else(|| ApiError::bad_request("keyword and domain are required"))?;

    info!(keyword = %query.keyword, domain = %query.domain, "rank:check");

    let serp = state.serp()?;
    let report = check_rank(serp, &query).await.map_err(serp_to_api_error)?;

    Ok(Json(RankCheckResponse {
        ok: true,
        debug: RankDebug {
            organic_count: report.organic_count,
            used_location: query.location.clone(),
        },
        query,
        outcome: report.outcome,
    }))
}
