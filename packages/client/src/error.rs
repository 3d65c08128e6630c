//! Client error types.

use rustyline::error::ReadlineError;
use thiserror::Error;
use tokio_tungstenite::tungstenite;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Failed to connect to {url}: {source}")]
    Connect {
        url: String,
        source: tungstenite::Error,
    },

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Readline error: {0}")]
    Readline(#[from] ReadlineError),
}
