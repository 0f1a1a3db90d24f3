use axum::Json;
use axum::extract::State;
use serde::Serialize;

use super::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub(super) async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}

#[derive(Serialize)]
pub struct HelloResponse {
    pub ok: bool,
    pub msg: &'static str,
}

pub(super) async fn hello() -> Json<HelloResponse> {
    Json(HelloResponse {
        ok: true,
        msg: "hello route works",
    })
}

/// Email configuration as seen by the server, without exposing the key.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugEnvResponse {
    pub has_resend_key: bool,
    pub key_prefix: Option<String>,
    pub from_email: Option<String>,
}

pub(super) async fn debug_env(State(state): State<AppState>) -> Json<DebugEnvResponse> {
    Json(DebugEnvResponse {
        has_resend_key: state.resend.is_some(),
        key_prefix: state.resend.as_ref().map(|r| r.key_prefix()),
        from_email: state.settings.from_email.clone(),
    })
}
