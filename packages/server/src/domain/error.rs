//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// Username validation error
    #[error("Username cannot be empty")]
    UsernameEmpty,

    /// Username too long error
    #[error("Username cannot exceed {max} characters (got {actual})")]
    UsernameTooLong { max: usize, actual: usize },

    /// RoomId validation error
    #[error("RoomId cannot be empty")]
    RoomIdEmpty,

    /// RoomId too long error
    #[error("RoomId cannot exceed {max} characters (got {actual})")]
    RoomIdTooLong { max: usize, actual: usize },

    /// SessionId invalid format error (not a valid UUID format)
    #[error("SessionId must be a valid UUID format (got: {0})")]
    SessionIdInvalidFormat(String),

    /// MessageContent validation error (empty or whitespace only)
    #[error("MessageContent cannot be empty")]
    MessageContentEmpty,

    /// MessageContent too long error
    #[error("MessageContent cannot exceed {max} characters (got {actual})")]
    MessageContentTooLong { max: usize, actual: usize },
}

/// Errors raised by a message store
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing store could not be reached or rejected the operation
    #[error("Message store unavailable: {0}")]
    Unavailable(String),

    /// The backing store did not answer in time
    #[error("Message store timed out after {0} ms")]
    Timeout(u64),

    /// A stored row could not be turned back into a domain message
    #[error("Corrupted message record: {0}")]
    Corrupted(String),

    /// Neither the configured store nor the ephemeral fallback could be opened
    #[error("No message store could be opened (primary: {primary}; fallback: {fallback})")]
    Exhausted { primary: String, fallback: String },
}
