//! Core domain models for the chat application.

use serde::{Deserialize, Serialize};

use super::value_object::{MessageContent, RoomId, SessionId, Timestamp, Username};

/// Default number of messages replayed to a session that joins a room
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Represents a chat message in the domain model
///
/// Messages are immutable once created; `created_at` is assigned by the
/// message store when the message is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Display name of the sender
    pub sender: Username,
    /// Message content
    pub content: MessageContent,
    /// Room the message was sent to
    pub room: RoomId,
    /// Timestamp when the message was persisted
    pub created_at: Timestamp,
}

impl ChatMessage {
    /// Create a new chat message
    pub fn new(
        sender: Username,
        content: MessageContent,
        room: RoomId,
        created_at: Timestamp,
    ) -> Self {
        Self {
            sender,
            content,
            room,
            created_at,
        }
    }
}

/// Lifecycle state of a connection session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Authenticated, not in any room
    Connected,
    /// Member of exactly one room
    InRoom(RoomId),
    /// Terminal state; no further events are delivered
    Disconnected,
}

/// Represents one live client connection
#[derive(Debug, Clone)]
pub struct ConnectionSession {
    /// Connection identifier
    pub id: SessionId,
    /// Authenticated username, fixed for the life of the session
    pub username: Username,
    /// Timestamp when the session connected
    pub connected_at: Timestamp,
    /// Current lifecycle state
    pub state: SessionState,
}

impl ConnectionSession {
    /// Create a new session in the `Connected` state
    pub fn new(id: SessionId, username: Username, connected_at: Timestamp) -> Self {
        Self {
            id,
            username,
            connected_at,
            state: SessionState::Connected,
        }
    }

    /// The room the session is currently in, if any
    pub fn current_room(&self) -> Option<&RoomId> {
        match &self.state {
            SessionState::InRoom(room) => Some(room),
            _ => None,
        }
    }

    /// Move the session into `room`, returning the room it was in before
    pub fn enter(&mut self, room: RoomId) -> Option<RoomId> {
        match std::mem::replace(&mut self.state, SessionState::InRoom(room)) {
            SessionState::InRoom(previous) => Some(previous),
            _ => None,
        }
    }

    /// Leave the current room, returning it
    pub fn exit(&mut self) -> Option<RoomId> {
        if !matches!(self.state, SessionState::InRoom(_)) {
            return None;
        }
        match std::mem::replace(&mut self.state, SessionState::Connected) {
            SessionState::InRoom(previous) => Some(previous),
            _ => None,
        }
    }

    /// Mark the session as disconnected
    pub fn close(&mut self) {
        self.state = SessionState::Disconnected;
    }

    pub fn is_disconnected(&self) -> bool {
        self.state == SessionState::Disconnected
    }
}

/// Event addressed to a single session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// History replay sent to a session that just joined `room`
    History {
        room: RoomId,
        messages: Vec<ChatMessage>,
    },
    /// A message broadcast to every member of its room
    NewMessage(ChatMessage),
}
