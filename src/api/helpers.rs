//! Common helper functions for API handlers.
//!
//! Response builders and the mapping from pipeline errors to HTTP status.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::warn;

use crate::errors::SummaryError;

/// Generic message for upstream and internal failures. Details go to the log only.
pub const SERVICE_ERROR_MESSAGE: &str = "Failed to generate summary. Please try again later.";

/// Error response carrying a status code and a `{ "error": ... }` body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        err_response(self.status, &self.message)
    }
}

impl From<SummaryError> for ApiError {
    fn from(error: SummaryError) -> Self {
        if error.is_validation() {
            let message = match error {
                SummaryError::Validation(m) => m,
                other => other.to_string(),
            };
            return bad_request(message);
        }
        service_error()
    }
}

/// Returns an error response with the given status code and message.
#[must_use]
pub fn err_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Constructs a 400 Bad Request error.
#[must_use]
pub fn bad_request(message: impl Into<String>) -> ApiError {
    ApiError {
        status: StatusCode::BAD_REQUEST,
        message: message.into(),
    }
}

/// Maps a body the `Json` extractor could not accept (missing, wrong content
/// type, malformed or mistyped) to a 400 in the usual error shape.
#[must_use]
pub fn rejected_body(operation: &str, source_kind: Option<&str>, rejection: &JsonRejection) -> ApiError {
    let detail = rejection.body_text();
    warn!(
        operation,
        source_kind,
        status = rejection.status().as_u16(),
        error = %detail,
        "Rejected request body"
    );
    bad_request(format!("Invalid request body: {detail}"))
}

/// Constructs the generic 500 returned for any upstream failure.
#[must_use]
pub fn service_error() -> ApiError {
    ApiError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: SERVICE_ERROR_MESSAGE.to_string(),
    }
}
