//! Client for the hosted content store.
//!
//! The store speaks PostgREST for tables, a GoTrue-compatible API for auth and
//! a simple object API for blobs. Nothing here knows about pages or sections;
//! that lives in [`crate::content`].

pub mod auth;
pub mod client;
pub mod query;
pub mod storage;

pub use auth::{Session, User};
pub use client::StoreClient;
pub use query::{Direction, Query};

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("content store request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("content store returned {status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error("{0} not found")]
    NotFound(String),

    #[error("refusing to {0} without a row filter")]
    UnfilteredMutation(&'static str),

    #[error("unexpected content store response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl StoreError {
    /// True when the store rejected the caller's credentials.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            StoreError::Api { status, .. }
                if *status == StatusCode::UNAUTHORIZED || *status == StatusCode::FORBIDDEN
        )
    }

    /// Build an `Api` error from a non-success response body.
    ///
    /// PostgREST and GoTrue both answer with JSON objects, but they disagree on
    /// the field name, so try the usual suspects before using the raw body.
    pub(crate) fn from_body(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                ["message", "error_description", "msg", "error"]
                    .iter()
                    .find_map(|key| value.get(key).and_then(|v| v.as_str()).map(str::to_string))
            })
            .unwrap_or_else(|| body.trim().to_string());
        StoreError::Api { status, message }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
