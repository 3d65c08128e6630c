//! Repository traits implemented by the infrastructure layer.

use async_trait::async_trait;

use super::{
    entity::ChatMessage,
    error::StoreError,
    value_object::{MessageContent, RoomId, Username},
};

/// Durable, append-only message store keyed by room
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Persist a message and return it with its assigned `created_at`.
    ///
    /// `created_at` is never earlier than the time of the call, nor earlier
    /// than the previous message stored for the same room.
    async fn append(
        &self,
        room: RoomId,
        sender: Username,
        content: MessageContent,
    ) -> Result<ChatMessage, StoreError>;

    /// Up to `limit` most recent messages of `room`, oldest first.
    async fn recent(&self, room: &RoomId, limit: usize) -> Result<Vec<ChatMessage>, StoreError>;

    /// Short name of the backend for logs and diagnostics
    fn backend(&self) -> &'static str;
}
