//! Per-request view context: display language and the signed-in user.
//!
//! Handlers receive these explicitly instead of reading process-wide state.

use std::convert::Infallible;
use std::sync::Arc;

use axum::async_trait;
use axum::extract::{FromRequestParts, Query};
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use serde::Deserialize;
use tracing::warn;

use super::error::AppError;
use super::state::AppState;
use crate::content::Audience;
use crate::i18n::{Language, LanguageStrings};
use crate::store::{StoreClient, User};

const LANGUAGE_COOKIE: &str = "lang";

#[derive(Debug, Deserialize)]
struct LanguageParams {
    lang: Option<String>,
}

pub struct ViewContext {
    pub language: Language,
    pub user: Option<User>,
    /// Store client carrying the caller's token when signed in.
    pub store: StoreClient,
    pub strings: &'static LanguageStrings,
}

impl ViewContext {
    pub fn audience(&self) -> Audience {
        Audience::for_signed_in(self.user.is_some())
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key == name).then_some(value)
        })
}

/// `?lang=` wins over the cookie; anything unrecognized means English.
fn requested_language(parts: &Parts, state: &AppState) -> Language {
    let from_query = Query::<LanguageParams>::try_from_uri(&parts.uri)
        .ok()
        .and_then(|Query(params)| params.lang);
    from_query
        .as_deref()
        .or_else(|| cookie(&parts.headers, LANGUAGE_COOKIE))
        .and_then(|code| Language::from_code(code, &state.registry).ok())
        .unwrap_or_default()
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for ViewContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let language = requested_language(parts, state);
        let strings = LanguageStrings::for_code(language.config(&state.registry).code);

        let mut store = state.store.clone();
        let mut user = None;
        if let Some(token) = bearer_token(&parts.headers) {
            let authed = state.store.with_access_token(token);
            match authed.current_user().await {
                Ok(Some(found)) => {
                    user = Some(found);
                    store = authed;
                }
                Ok(None) => {}
                // Public pages stay reachable when the auth API is down
                Err(e) => warn!("Could not verify session, continuing anonymously: {}", e),
            }
        }

        Ok(ViewContext {
            language,
            user,
            store,
            strings,
        })
    }
}

/// A signed-in admin. Rejects the request with 401 otherwise.
pub struct AdminSession {
    pub ctx: ViewContext,
    pub user: User,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let ctx = match ViewContext::from_request_parts(parts, state).await {
            Ok(ctx) => ctx,
            Err(never) => match never {},
        };
        match ctx.user.clone() {
            Some(user) => Ok(AdminSession { ctx, user }),
            None => Err(AppError::Unauthorized(ctx.strings.sign_in_required)),
        }
    }
}
