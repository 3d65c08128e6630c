//! HTTP API response DTOs for the chat application.

use serde::{Deserialize, Serialize};

use super::websocket::MessageDto;

/// Active room summary for list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub id: String,
    /// Number of sessions currently in the room
    pub members: usize,
}

/// Recent messages of a room (REST fallback for history replay)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesResponseDto {
    pub messages: Vec<MessageDto>,
}

/// Generic error body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponseDto {
    pub error: String,
}
