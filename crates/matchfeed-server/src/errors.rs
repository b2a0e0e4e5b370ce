//! API error type with HTTP mappings.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use matchfeed_pipeline::PipelineError;

/// Errors surfaced to HTTP clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request (missing fields, bad parameters). 400.
    #[error("{0}")]
    BadRequest(String),

    /// The addressed resource does not exist. 404.
    #[error("{0}")]
    NotFound(String),

    /// The request conflicts with current state. 409.
    #[error("{0}")]
    Conflict(String),

    /// Backend failure. 500.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
            }
        });
        (self.status(), Json(body)).into_response()
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::MalformedRange { .. } => Self::BadRequest(err.to_string()),
            PipelineError::OutOfOrderFlush { .. } => Self::Conflict(err.to_string()),
            PipelineError::Gateway(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<matchfeed_pipeline::GatewayError> for ApiError {
    fn from(err: matchfeed_pipeline::GatewayError) -> Self {
        Self::Internal(err.to_string())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
