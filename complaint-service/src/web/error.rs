//! HTTP error responses.
//!
//! Bodies use a single `detail` key: a list of field errors for validation
//! failures, a fixed sentence for everything else. Internal error text never
//! reaches the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::complaint::ValidationErrors;

/// Client-facing text for any failure to hand a complaint to the queue.
pub const SUBMISSION_FAILED_DETAIL: &str = "Failed to submit complaint. Please try again later.";

/// Errors returned by the complaint endpoints.
#[derive(Debug)]
pub enum ApiError {
    /// 422 with per-field detail
    Validation(ValidationErrors),
    /// 500 with a fixed message
    SubmissionFailed,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "detail": errors })),
            )
                .into_response(),
            ApiError::SubmissionFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "detail": SUBMISSION_FAILED_DETAIL })),
            )
                .into_response(),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}
