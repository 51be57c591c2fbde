//! Inbound database webhook.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{debug, warn};

use crate::realtime::WebhookPayload;
use crate::security::constant_time_compare;
use crate::server::state::AppState;

/// Header carrying the shared secret configured on the database webhook.
pub const SECRET_HEADER: &str = "x-webhook-secret";

/// Handle POST /hooks/changes.
///
/// Disabled (404) unless a secret is configured; a wrong or missing secret
/// gets 401.
pub async fn receive_change(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(expected) = state.config.webhook_secret.as_deref() else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let provided = headers
        .get(SECRET_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if !constant_time_compare(provided, expected) {
        warn!("Rejected change webhook with invalid secret");
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let payload: WebhookPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            return (StatusCode::BAD_REQUEST, Json(json!({"error": e.to_string()}))).into_response()
        }
    };
    let Some(event) = payload.into_event() else {
        return (StatusCode::ACCEPTED, Json(json!({"delivered": 0}))).into_response();
    };
    debug!("Change on {}: {:?}", event.table, event.event);
    let delivered = state.feed.publish(event);
    (StatusCode::ACCEPTED, Json(json!({"delivered": delivered}))).into_response()
}
