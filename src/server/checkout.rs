use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::HeaderMap;
use axum::http::header::ORIGIN;
use serde::Serialize;
use tracing::info;

use super::errors::{rejection_to_api_error, stripe_to_api_error};
use super::params::CheckoutParams;
use super::{ApiError, AppState};
use crate::stripe::{CheckoutRequest, Tier};

const DEFAULT_ORIGIN: &str = "http://localhost:3000";

#[derive(Serialize)]
pub struct CheckoutResponse {
    pub url: String,
}

pub(super) async fn create_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<CheckoutParams>, JsonRejection>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let Json(params) = body.map_err(rejection_to_api_error)?;

    let tier = params
        .tier
        .as_deref()
        .and_then(|t| t.parse::<Tier>().ok())
        .ok_or_else(|| ApiError::bad_request("Invalid tier"))?;
    let price_id = state
        .settings
        .prices
        .price_for(tier)
        .ok_or_else(|| ApiError::bad_request("Invalid tier"))?
        .to_string();

    let origin = headers
        .get(ORIGIN)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_ORIGIN)
        .trim_end_matches('/')
        .to_string();

    info!(%tier, origin = %origin, "checkout:session");

    let stripe = state.stripe()?;
    let request = CheckoutRequest {
        tier,
        price_id,
        origin,
    };
    let url = stripe
        .create_checkout_session(&request)
        .await
        .map_err(stripe_to_api_error)?;
    Ok(Json(CheckoutResponse { url }))
}
