use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::email::EmailError;
use crate::openai::OpenAiError;
use crate::serp::SerpError;
use crate::stripe::StripeError;

/// Error returned to HTTP callers as `{"ok": false, "error": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    ok: bool,
    error: &'a str,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            ok: false,
            error: &self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

pub(super) fn rejection_to_api_error(rejection: JsonRejection) -> ApiError {
    ApiError::bad_request(rejection.body_text())
}

pub(super) fn query_rejection_to_api_error(rejection: QueryRejection) -> ApiError {
    ApiError::bad_request(rejection.body_text())
}

pub(super) fn serp_to_api_error(e: SerpError) -> ApiError {
    match &e {
        SerpError::ApiKeyNotSet => ApiError::internal(e.to_string()),
        SerpError::Api { .. } | SerpError::Network(_) => {
            ApiError::new(StatusCode::BAD_GATEWAY, e.to_string())
        }
    }
}

pub(super) fn openai_to_api_error(e: OpenAiError) -> ApiError {
    ApiError::internal(e.to_string())
}

pub(super) fn stripe_to_api_error(e: StripeError) -> ApiError {
    ApiError::internal(e.to_string())
}

pub(super) fn email_to_api_error(e: EmailError) -> ApiError {
    match &e {
        EmailError::ApiKeyNotSet => ApiError::internal(e.to_string()),
        _ => ApiError::internal(format!("Resend error: {e}")),
    }
}
