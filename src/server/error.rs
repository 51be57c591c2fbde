//! Error responses for the HTTP API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use crate::content::ContentError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// No valid session for an admin route.
    #[error("{0}")]
    Unauthorized(&'static str),

    /// Submitted data was rejected.
    #[error("{0}")]
    BadRequest(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    /// The store failed; the client only sees `message`.
    #[error("{message}: {source}")]
    Failed {
        message: &'static str,
        source: ContentError,
    },
}

impl AppError {
    /// Classify a content error, hiding store details behind `message`.
    pub fn failed(message: &'static str, err: ContentError) -> Self {
        match err {
            ContentError::NotFound(what) => AppError::NotFound(what),
            err if err.is_validation() => AppError::BadRequest(err.to_string()),
            source => AppError::Failed { message, source },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Unauthorized(message) => (StatusCode::UNAUTHORIZED, json!({"error": message})),
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, json!({"error": message})),
            Self::NotFound(what) => (
                StatusCode::NOT_FOUND,
                json!({"error": format!("{} not found", what)}),
            ),
            Self::Failed { message, source } => {
                error!("{}: {}", message, source);
                (StatusCode::BAD_GATEWAY, json!({"error": message}))
            }
        };

        (status, axum::Json(body)).into_response()
    }
}
