//! Mapping of domain errors onto HTTP responses.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use coown_core::error::CoownError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Error returned by every API handler. Rendered as `{ "error": message }`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] CoownError),

    /// The request could not be decoded.
    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Domain(err) => match err {
                CoownError::Validation { .. } => StatusCode::BAD_REQUEST,
                CoownError::NotFound { .. } => StatusCode::NOT_FOUND,
                CoownError::Integrity { .. } => StatusCode::CONFLICT,
                CoownError::Database(_) | CoownError::Internal(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    /// Text sent to the client. Validation messages go out verbatim.
    pub fn message(&self) -> String {
        match self {
            Self::Domain(CoownError::Validation { message }) => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // Storage details stay in the log.
        let message = if status.is_server_error() {
            error!(error = %self, "request failed");
            "internal server error".to_string()
        } else {
            self.message()
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
