//! Command-line chat client library.
//!
//! Connects to a hiroba server over WebSocket, joins a room and renders the
//! room's history and live messages.

pub mod command;
pub mod error;
pub mod formatter;
pub mod session;
pub mod view;

// Re-export entry points
pub use error::ClientError;
pub use session::{ClientConfig, run_client};
