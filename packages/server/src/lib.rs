//! Room-based real-time chat server library.
//!
//! Sessions join named rooms over WebSocket, receive the room's recent
//! history on join and every message sent to the room afterwards.

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use config::ServerConfig;
pub use ui::{ServerError, build_router, run_server};
