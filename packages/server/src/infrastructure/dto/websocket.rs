//! WebSocket message DTOs for the chat application.
//!
//! Every frame is a JSON text frame of the form
//! `{"event": "<name>", "data": <payload>}`.

use serde::{Deserialize, Serialize};

use crate::domain::{ChatMessage, SessionEvent};

/// Events sent by clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Join (or switch to) a room
    JoinRoom(String),
    /// Send a message to the current room
    SendMessage(SendMessagePayload),
    /// Leave the current room
    LeaveRoom,
}

/// Payload of `send_message`
///
/// `sender` and `room` are informational; the server uses the
/// authenticated username and the session's current room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessagePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
}

/// Events sent by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// History replay, sent only to the session that joined
    MessageHistory(HistoryPayload),
    /// A message broadcast to every member of the room
    ReceiveMessage(MessageDto),
}

/// Payload of `message_history`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryPayload {
    pub room: String,
    /// Oldest first
    pub messages: Vec<MessageDto>,
}

/// A persisted (or best-effort) chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    pub sender: String,
    pub content: String,
    pub room: String,
    /// Unix timestamp (milliseconds since epoch)
    pub created_at: i64,
}

impl From<&ChatMessage> for MessageDto {
    fn from(message: &ChatMessage) -> Self {
        Self {
            sender: message.sender.as_str().to_string(),
            content: message.content.as_str().to_string(),
            room: message.room.as_str().to_string(),
            created_at: message.created_at.value(),
        }
    }
}

impl From<SessionEvent> for ServerEvent {
    fn from(event: SessionEvent) -> Self {
        match event {
            SessionEvent::History { room, messages } => ServerEvent::MessageHistory(HistoryPayload {
                room: room.into_string(),
                messages: messages.iter().map(MessageDto::from).collect(),
            }),
            SessionEvent::NewMessage(message) => ServerEvent::ReceiveMessage(MessageDto::from(&message)),
        }
    }
}
