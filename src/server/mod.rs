// src/server/mod.rs

//! HTTP surface.
//!
//! - `POST /{key}` runs every task of hook `key`.
//! - `POST /{key}/{task}` runs only the task named `task`.

pub mod handlers;
pub mod state;

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use state::AppState;

/// Git services may post large push payloads (GitHub caps them at 25 MB).
const MAX_PAYLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Build the axum router for the webhook endpoints.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/{key}", post(handlers::run_hook))
        .route("/{key}/{task}", post(handlers::run_hook_task))
        .layer(DefaultBodyLimit::max(MAX_PAYLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding webhook listener on {addr}"))?;

    info!(%addr, hooks = state.dispatcher.registry().len(), "hookrunner listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving webhook requests")?;

    info!("hookrunner stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        eprintln!("failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
