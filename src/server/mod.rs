//! HTTP surface: public site API, admin CMS, change webhook and websocket.

pub mod app;
pub mod context;
pub mod error;
pub mod handlers;
pub mod state;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::Config;
use crate::realtime::spawn_navigation_refresh;
use state::AppState;

/// Build the state, start the navigation refresher and serve until Ctrl-C.
pub async fn run_server(config: Config) -> Result<()> {
    let port = config.port;
    let state = Arc::new(AppState::new(config)?);

    spawn_navigation_refresh(
        &state.feed,
        Arc::clone(&state.navigation),
        state.store.clone(),
        state.registry.clone(),
    );

    // The first request retries if the store is unreachable right now
    if let Err(e) = state.navigation.refresh(&state.store, &state.registry).await {
        warn!("Initial navigation load failed: {}", e);
    }

    let app = app::create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, stopping server");
}
