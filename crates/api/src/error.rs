//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::DomainError;
use workflow::WorkflowError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed request: bad id format, unknown query filter.
    BadRequest(String),
    /// A workflow or domain rule rejected the request, or the workflow
    /// failed; unknown entities become 404, rule rejections 400.
    Workflow(WorkflowError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Workflow(err) => workflow_error_to_response(err),
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn workflow_error_to_response(err: WorkflowError) -> (StatusCode, String) {
    if err.is_not_found() {
        return (StatusCode::NOT_FOUND, err.to_string());
    }
    match err.as_domain() {
        // Rule rejections are the client's fault, including racing another
        // customer to the last unit of stock.
        Some(
            DomainError::InsufficientStock { .. }
            | DomainError::InvalidTransition { .. }
            | DomainError::NoItems
            | DomainError::InvalidQuantity { .. }
            | DomainError::InvalidPrice { .. }
            | DomainError::InvalidReference(_),
        ) => (StatusCode::BAD_REQUEST, err.to_string()),
        None => {
            tracing::error!(error = %err, "workflow failure");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        ApiError::Workflow(err)
    }
}
