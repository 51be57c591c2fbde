use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::store::{Session, StoreError, User};
use crate::server::context::{AdminSession, ViewContext};
use crate::server::error::AppError;
use crate::server::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<User>,
}

/// Handle POST /api/auth/login.
pub async fn login(
    State(state): State<Arc<AppState>>,
    ctx: ViewContext,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Session>, AppError> {
    match state.store.sign_in(request.email.trim(), &request.password).await {
        Ok(session) => Ok(Json(session)),
        Err(e @ StoreError::Api { status, .. }) if status.is_client_error() => {
            info!("Rejected sign-in: {}", e);
            Err(AppError::Unauthorized(ctx.strings.sign_in_failed))
        }
        Err(e) => Err(AppError::failed(ctx.strings.sign_in_failed, e.into())),
    }
}

/// Handle POST /api/auth/logout.
pub async fn logout(session: AdminSession) -> StatusCode {
    // The token expires on its own if revocation fails
    if let Err(e) = session.ctx.store.sign_out().await {
        warn!("Sign-out for {} failed: {}", session.user.id, e);
    }
    StatusCode::NO_CONTENT
}

/// Handle GET /api/auth/session.
pub async fn current_session(ctx: ViewContext) -> Json<SessionResponse> {
    Json(SessionResponse { user: ctx.user })
}
