//! Tracing subscriber setup.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Build the default filter directive for a binary.
///
/// Cargo binary names use `-` while tracing targets use `_`, so the binary
/// name is normalized before being used as a target.
pub fn default_directive(bin_name: &str, level: &str) -> String {
    let target = bin_name.replace('-', "_");
    format!("{target}={level},hiroba_server={level},hiroba_client={level},tower_http={level}")
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `default_level` when it is set.
pub fn setup_logger(bin_name: &str, default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(bin_name, default_level)));

    let directive = filter.to_string();
    if tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_ansi(true))
        .try_init()
        .is_ok()
    {
        tracing::debug!("Logger initialized ({})", directive);
    }
}
