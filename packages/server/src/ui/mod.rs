//! WebSocket chat server implementation.

mod handler;
mod signal;
pub mod state;

use std::sync::Arc;

use axum::{Router, routing::get};
use thiserror::Error;
use tower_http::trace::TraceLayer;

use crate::{
    config::ServerConfig, domain::StoreError, infrastructure::repository::open_message_store,
};

pub use signal::shutdown_signal;
use state::AppState;

/// Fatal server errors
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to open message store: {0}")]
    Store(#[from] StoreError),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Build the HTTP + WebSocket router
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(handler::health_check))
        .route("/api/rooms", get(handler::get_rooms))
        .route("/api/messages", get(handler::get_messages))
        .route("/ws", get(handler::websocket_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Open the store, bind the listener and serve until a shutdown signal arrives
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let store = open_message_store(config.store, &config.database_url, config.store_timeout()).await?;
    tracing::info!("Message store backend: {}", store.backend());

    let state = Arc::new(AppState::new(store, config.history_limit));
    let app = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
