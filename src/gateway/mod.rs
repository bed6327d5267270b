//! HTTP gateway
//!
//! Thin axum transport over [`crate::transfer::TransferOrchestrator`] and
//! [`crate::account::AccountService`]. Every response uses the
//! [`types::ApiResponse`] envelope.

pub mod handlers;
pub mod state;
pub mod types;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;

pub use state::AppState;

use crate::config::GatewayConfig;

/// Build the route table.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route(
            "/transactions",
            post(handlers::create_transfer).get(handlers::list_transfers),
        )
        .route(
            "/transactions/{id}",
            get(handlers::get_transfer).delete(handlers::delete_transfer),
        )
        .route(
            "/accounts",
            post(handlers::create_account).get(handlers::list_accounts),
        )
        .route(
            "/accounts/{id}",
            get(handlers::get_account).delete(handlers::delete_account),
        )
        .with_state(state)
}

/// Start HTTP Gateway server, returning once Ctrl-C is received.
pub async fn run_server(config: &GatewayConfig, state: Arc<AppState>) -> std::io::Result<()> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        tracing::error!(%addr, error = %e, "Failed to bind gateway, port may already be in use");
        e
    })?;

    tracing::info!(%addr, "Gateway listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl-C handler");
        // Never resolve: keep serving rather than exit at once
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
