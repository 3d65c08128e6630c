//! Server configuration (command line with environment fallbacks).

use std::time::Duration;

use clap::Parser;

use crate::{domain::DEFAULT_HISTORY_LIMIT, infrastructure::repository::StoreKind};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "hiroba-server",
    about = "Room-based real-time chat server",
    author,
    version
)]
pub struct ServerConfig {
    #[arg(long, env = "HIROBA_HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, env = "HIROBA_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Message store backend
    #[arg(long, value_enum, env = "HIROBA_STORE", default_value_t = StoreKind::Sqlite)]
    pub store: StoreKind,

    #[arg(
        long,
        env = "HIROBA_DATABASE_URL",
        default_value = "sqlite://hiroba.db?mode=rwc",
        help = "SQLite database URL (ignored with --store memory)"
    )]
    pub database_url: String,

    /// Upper bound for connecting to and querying the message store
    #[arg(long, env = "HIROBA_STORE_TIMEOUT_SECS", default_value_t = 5)]
    pub store_timeout_secs: u64,

    /// Number of messages replayed on join
    #[arg(long, env = "HIROBA_HISTORY_LIMIT", default_value_t = DEFAULT_HISTORY_LIMIT)]
    pub history_limit: usize,

    #[arg(long, env = "HIROBA_LOG_LEVEL", default_value = "debug")]
    pub log_level: String,
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs)
    }
}
