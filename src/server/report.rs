use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use serde::Serialize;
use tracing::info;

use super::errors::{email_to_api_error, query_rejection_to_api_error, rejection_to_api_error};
use super::params::{BatchQuery, ReportSendParams, ReportTestQuery};
use super::{ApiError, AppState};
use crate::email::batch::run_batch;
use crate::email::report::{ReportData, month_label, render_monthly_report, subject};
use crate::email::{BatchOutcome, Mailer, OutgoingEmail};

const TEST_SUBJECT: &str = "LVB test — plain text";
const TEST_BODY: &str = "If you see this, Resend is working end-to-end.";

#[derive(Serialize)]
pub struct SendResponse {
    pub ok: bool,
    pub id: Option<String>,
}

#[derive(Serialize)]
pub struct BatchResponse {
    pub ok: bool,
    pub sent: Vec<BatchOutcome>,
}

pub(super) async fn send(
    State(state): State<AppState>,
    body: Result<Json<ReportSendParams>, JsonRejection>,
) -> Result<Json<SendResponse>, ApiError> {
    let resend = state.resend()?;
    let from = state.settings.from_email.as_deref().ok_or_else(|| {
        ApiError::internal("FROM_EMAIL missing (e.g., onboarding@resend.dev or your verified domain)")
    })?;

    let Json(params) = body.map_err(rejection_to_api_error)?;
    let report = params.required().ok_or_else(|| {
        ApiError::bad_request("toEmail, businessName, and monthLabel are required")
    })?;

    info!(business = %report.business_name, month = %report.month_label, "report:send");

    let html = render_monthly_report(&ReportData {
        business_name: &report.business_name,
        month_label: &report.month_label,
        highlights: &report.highlights,
        keywords: &report.keywords,
    });
    let email = OutgoingEmail {
        from: from.to_string(),
        to: report.to_email,
        subject: subject(&report.business_name, &report.month_label),
        html: Some(html),
        text: None,
    };

    let id = resend.send(&email).await.map_err(email_to_api_error)?;
    Ok(Json(SendResponse { ok: true, id }))
}

pub(super) async fn send_test(
    State(state): State<AppState>,
    query: Result<Query<ReportTestQuery>, QueryRejection>,
) -> Result<Json<SendResponse>, ApiError> {
    let Query(query) = query.map_err(query_rejection_to_api_error)?;
    let resend = state.resend()?;
    let to = query
        .recipient()
        .or_else(|| state.settings.report_test_to.clone())
        .ok_or_else(|| ApiError::bad_request("No recipient: pass ?to= or set REPORT_TEST_TO"))?;

    info!(to = %to, "report:test");

    let email = OutgoingEmail {
        from: state.settings.sender().to_string(),
        to,
        subject: TEST_SUBJECT.to_string(),
        html: None,
        text: Some(TEST_BODY.to_string()),
    };
    let id = resend.send(&email).await.map_err(email_to_api_error)?;
    Ok(Json(SendResponse { ok: true, id }))
}

/// Manual trigger.
pub(super) async fn batch_manual(
    State(state): State<AppState>,
) -> Result<Json<BatchResponse>, ApiError> {
    run_configured_batch(&state).await
}

/// Scheduler trigger, authorized by `?key=` matching `CRON_SECRET`.
pub(super) async fn batch_scheduled(
    State(state): State<AppState>,
    query: Result<Query<BatchQuery>, QueryRejection>,
) -> Result<Json<BatchResponse>, ApiError> {
    let Query(query) = query.map_err(query_rejection_to_api_error)?;
    let secret = state
        .settings
        .cron_secret
        .as_deref()
        .ok_or_else(|| ApiError::internal("CRON_SECRET not set"))?;
    if query.key.as_deref() != Some(secret) {
        return Err(ApiError::unauthorized());
    }
    run_configured_batch(&state).await
}

async fn run_configured_batch(state: &AppState) -> Result<Json<BatchResponse>, ApiError> {
    let resend = state.resend()?;
    let month = month_label(&chrono::Local::now());

    info!(clients = state.settings.batch_clients.len(), month = %month, "report:batch");

    let sent = run_batch(
        resend,
        state.settings.sender(),
        &state.settings.batch_clients,
        &month,
    )
    .await;
    Ok(Json(BatchResponse { ok: true, sent }))
}
