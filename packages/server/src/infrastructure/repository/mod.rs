//! Repository パターンの実装
//!
//! ドメイン層が定義する Repository trait の具体的な実装を提供します。
//! UseCase 層は trait（ドメイン層）に依存し、この実装に直接依存しません（依存性の逆転）。

pub mod inmemory;
pub mod sqlite;

use std::{sync::Arc, time::Duration};

use crate::domain::{MessageRepository, StoreError};

pub use inmemory::InMemoryMessageRepository;
pub use sqlite::SqliteMessageRepository;

/// Message store backend selected at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StoreKind {
    /// SQLite database, with an in-memory SQLite fallback
    Sqlite,
    /// Process memory only
    Memory,
}

/// Open the message store once at process start.
///
/// For [`StoreKind::Sqlite`], a database that cannot be opened is replaced by
/// an ephemeral in-memory SQLite database so the service stays available.
/// Only when the fallback fails too is an error returned.
pub async fn open_message_store(
    kind: StoreKind,
    database_url: &str,
    timeout: Duration,
) -> Result<Arc<dyn MessageRepository>, StoreError> {
    match kind {
        StoreKind::Memory => {
            tracing::warn!("Using in-process message store; messages are lost on restart");
            Ok(Arc::new(InMemoryMessageRepository::new()))
        }
        StoreKind::Sqlite => match SqliteMessageRepository::connect(database_url, timeout).await {
            Ok(repo) => {
                tracing::info!("Message store connected: {}", database_url);
                Ok(Arc::new(repo))
            }
            Err(primary) => {
                tracing::warn!(
                    "Could not open message store at {}: {}. Falling back to in-memory SQLite",
                    database_url,
                    primary
                );
                match SqliteMessageRepository::connect_ephemeral(timeout).await {
                    Ok(repo) => {
                        tracing::warn!("In-memory message store started; data will be lost when the server stops");
                        Ok(Arc::new(repo))
                    }
                    Err(fallback) => {
                        tracing::error!("Failed to start in-memory message store: {}", fallback);
                        Err(StoreError::Exhausted {
                            primary: primary.to_string(),
                            fallback: fallback.to_string(),
                        })
                    }
                }
            }
        },
    }
}
