//! SQLite Repository 実装（sqlx）

pub mod message;

pub use message::SqliteMessageRepository;
