//! Server state and request parameters.

use serde::Deserialize;
use std::sync::Arc;

use crate::{domain::MessageRepository, infrastructure::hub::SessionHub};

/// Query parameters for WebSocket connection
///
/// `username` is supplied by the external identity provider.
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub username: Option<String>,
}

/// Query parameters for `/api/messages`
#[derive(Debug, Deserialize)]
pub struct MessagesQuery {
    pub room: Option<String>,
    pub limit: Option<usize>,
}

/// Shared application state
pub struct AppState {
    /// Message store, opened once at startup
    pub store: Arc<dyn MessageRepository>,
    /// Live sessions and room membership
    pub hub: Arc<SessionHub>,
    /// Number of messages replayed on join
    pub history_limit: usize,
}

impl AppState {
    pub fn new(store: Arc<dyn MessageRepository>, history_limit: usize) -> Self {
        Self {
            store,
            hub: Arc::new(SessionHub::new()),
            history_limit,
        }
    }
}
