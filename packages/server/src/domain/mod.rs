//! Domain layer for the chat application.
//!
//! This module contains business logic that is independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod factory;
pub mod registry;
pub mod repository;
pub mod value_object;

pub use entity::{ChatMessage, ConnectionSession, DEFAULT_HISTORY_LIMIT, SessionEvent, SessionState};
pub use error::{StoreError, ValueObjectError};
pub use factory::SessionIdFactory;
pub use registry::RoomRegistry;
pub use repository::MessageRepository;
pub use value_object::{MessageContent, RoomId, SessionId, Timestamp, Username};
