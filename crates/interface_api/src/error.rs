//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

use core_kernel::PortError;
use domain_claims::ClaimError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {message}")]
    Validation { message: String, details: Vec<String> },
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message, details) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg, None),
            ApiError::Database(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error", msg, None),
            ApiError::Validation { message, details } => {
                (StatusCode::BAD_REQUEST, "validation_error", message, Some(details))
            }
        };

        if status.is_server_error() {
            error!(error = error_type, %message, "request failed");
        }

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<PortError> for ApiError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            PortError::Validation { .. } => ApiError::BadRequest(err.to_string()),
            PortError::Conflict { .. } => ApiError::Conflict(err.to_string()),
            PortError::Connection { .. } => ApiError::Database(err.to_string()),
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<ClaimError> for ApiError {
    fn from(err: ClaimError) -> Self {
        match err {
            ClaimError::ClaimNotFound(number) => ApiError::NotFound(format!("Claim {} not found", number)),
            ClaimError::InvalidStatusTransition { .. } => ApiError::Conflict(err.to_string()),
            ClaimError::Port(port) => port.into(),
            ClaimError::ClaimNumberExhausted(_) | ClaimError::Temporal(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut details: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(message) => format!("{}: {}", field, message),
                    None => format!("{}: {}", field, e.code),
                })
            })
            .collect();
        details.sort();

        ApiError::Validation {
            message: "Claim request failed validation".to_string(),
            details,
        }
    }
}
