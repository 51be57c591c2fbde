//! Navigation API endpoint.
//!
//! Anonymous visitors get the cached public forest, rebuilt by the change
//! feed. Signed-in admins get a fresh build that includes admin-only pages.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::content::{Audience, SiteLabels};
use crate::i18n::Language;
use crate::navigation::NavNode;
use crate::realtime::{build_snapshot, NavSnapshot};
use crate::server::context::ViewContext;
use crate::server::error::AppError;
use crate::server::state::AppState;

/// Response for GET /api/navigation.
#[derive(Debug, Serialize)]
pub struct NavigationResponse {
    language: Language,
    /// Brand label in the display language.
    portfolio_label: String,
    labels: SiteLabels,
    items: Vec<NavItem>,
}

/// Localized navigation entry.
#[derive(Debug, Serialize)]
pub struct NavItem {
    id: String,
    title: String,
    href: String,
    only_for_admin: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<NavItem>,
}

impl NavItem {
    // Recursion depth equals tree depth, the same bound serialization has
    fn from_node(node: &NavNode, language: Language) -> Self {
        Self {
            id: node.page.id.clone(),
            title: node.title_for(language).to_string(),
            href: node.href(),
            only_for_admin: node.page.only_for_admin,
            children: node
                .children
                .iter()
                .map(|child| NavItem::from_node(child, language))
                .collect(),
        }
    }
}

fn respond(snapshot: NavSnapshot, language: Language) -> NavigationResponse {
    let labels = snapshot.labels;
    NavigationResponse {
        language,
        portfolio_label: language
            .pick(&labels.portfolio_label, Some(&labels.portfolio_label_native))
            .to_string(),
        items: snapshot
            .pages
            .iter()
            .map(|node| NavItem::from_node(node, language))
            .collect(),
        labels,
    }
}

/// Handle GET /api/navigation.
pub async fn get_navigation(
    State(state): State<Arc<AppState>>,
    ctx: ViewContext,
) -> Result<Json<NavigationResponse>, AppError> {
    let fail = |e| AppError::failed(ctx.strings.load_page_failed, e);

    let snapshot = match ctx.audience() {
        Audience::Admin => build_snapshot(&ctx.store, &state.registry, Audience::Admin)
            .await
            .map_err(fail)?,
        Audience::Public => match state.navigation.get().await {
            Some(snapshot) => snapshot,
            // First request before any change event: build it now
            None => state
                .navigation
                .refresh(&state.store, &state.registry)
                .await
                .map_err(fail)?,
        },
    };

    Ok(Json(respond(snapshot, ctx.language)))
}
