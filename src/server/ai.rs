use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::Serialize;
use tracing::info;

use super::errors::{openai_to_api_error, rejection_to_api_error};
use super::params::{DraftPostParams, DraftReplyParams};
use super::{ApiError, AppState};
use crate::openai::drafts;

#[derive(Serialize)]
pub struct DraftResponse {
    pub text: String,
}

pub(super) async fn draft_post(
    State(state): State<AppState>,
    body: Result<Json<DraftPostParams>, JsonRejection>,
) -> Result<Json<DraftResponse>, ApiError> {
    let openai = state.openai()?;
    let Json(params) = body.map_err(rejection_to_api_error)?;
    let (business, topic) = params
        .required()
        .ok_or_else(|| ApiError::bad_request(r#"Missing "business" or "topic""#))?;

    info!(business = %business, "ai:draft-post");

    let text = drafts::draft_post(openai, &business, &topic)
        .await
        .map_err(openai_to_api_error)?;
    Ok(Json(DraftResponse { text }))
}

pub(super) async fn draft_reply(
    State(state): State<AppState>,
    body: Result<Json<DraftReplyParams>, JsonRejection>,
) -> Result<Json<DraftResponse>, ApiError> {
    let openai = state.openai()?;
    let Json(params) = body.map_err(rejection_to_api_error)?;
    let (business, review_text) = params
        .required()
        .ok_or_else(|| ApiError::bad_request(r#"Missing "business" or "reviewText""#))?;

    info!(business = %business, "ai:draft-reply");

    let text = drafts::draft_reply(openai, &business, &review_text)
        .await
        .map_err(openai_to_api_error)?;
    Ok(Json(DraftResponse { text }))
}
