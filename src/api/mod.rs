//! HTTP API for the squad-ladder service
//!
//! Mounts the player, team and match endpoints alongside the health probes
//! and the Prometheus scrape endpoint, all on one axum router.

pub mod handlers;

use crate::service::AppState;
use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

pub use handlers::{CreatePlayerRequest, CreateTeamRequest, RecordMatchRequest};

/// Create the Axum router with every endpoint
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::root_handler))
        .route("/players", get(handlers::list_players))
        .route("/players/create", post(handlers::create_player))
        .route("/players/{id}", get(handlers::get_player))
        .route("/teams", post(handlers::create_team))
        .route("/teams/{id}", get(handlers::get_team))
        .route("/matches", post(handlers::record_match))
        .route("/health", get(handlers::health_handler))
        .route("/ready", get(handlers::ready_handler))
        .route("/alive", get(handlers::alive_handler))
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(state)
}

/// Serve the API until `shutdown` resolves
pub async fn serve(state: Arc<AppState>, shutdown: impl Future<Output = ()> + Send + 'static) -> Result<()> {
    let addr: SocketAddr = state
        .config()
        .http_addr()
        .parse()
        .context("Invalid HTTP server address")?;

    let app = create_router(state);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("HTTP server stopped");
    Ok(())
}
