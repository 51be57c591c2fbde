//! Router construction.

use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::trace::TraceLayer;

use super::handlers::{admin, auth, docs, hooks, navigation, pages, portfolio, ws};
use super::state::AppState;

/// Build the application router with all routes and middleware.
pub fn create_router(state: Arc<AppState>) -> Router {
    let public = Router::new()
        .route("/api/navigation", get(navigation::get_navigation))
        .route("/api/portfolio", get(portfolio::get_portfolio))
        .route("/api/docs", get(docs::list_docs))
        .route("/api/pages/:page_slug", get(pages::get_page))
        .route(
            "/api/pages/:page_slug/sections/:section_slug",
            get(pages::get_section),
        );

    let auth_routes = Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/session", get(auth::current_session));

    let admin_routes = Router::new()
        .route(
            "/api/admin/pages",
            get(admin::list_pages).post(admin::create_page),
        )
        .route(
            "/api/admin/pages/:id",
            get(admin::get_page)
                .put(admin::update_page)
                .delete(admin::delete_page),
        )
        .route("/api/admin/sections", post(admin::create_section))
        .route(
            "/api/admin/sections/:id",
            put(admin::update_section).delete(admin::delete_section),
        )
        .route(
            "/api/admin/portfolio",
            get(admin::get_portfolio).put(admin::save_portfolio),
        )
        .route(
            "/api/admin/portfolio/quick-stats",
            post(admin::add_quick_stat),
        )
        .route(
            "/api/admin/portfolio/quick-stats/:index",
            delete(admin::remove_quick_stat),
        )
        .route("/api/admin/images", post(admin::upload_image))
        .route("/api/admin/richtext/image-layout", post(admin::image_layout))
        .route("/api/admin/richtext/preview", post(admin::preview));

    let realtime = Router::new()
        .route("/hooks/changes", post(hooks::receive_change))
        .route("/ws/changes", get(ws::ws_handler));

    Router::new()
        .merge(public)
        .merge(auth_routes)
        .merge(admin_routes)
        .merge(realtime)
        .route("/health", get(|| async { "OK" }))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
