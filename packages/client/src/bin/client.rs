//! Interactive command-line chat client.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-client -- --username alice --room general
//! ```

use clap::Parser;
use hiroba_client::ClientConfig;
use hiroba_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "hiroba-client", about = "Chat in hiroba rooms from the terminal", author, version)]
struct ClientArgs {
    /// Server base URL
    #[arg(long, env = "HIROBA_URL", default_value = "ws://127.0.0.1:8080")]
    url: String,

    #[arg(short, long)]
    username: String,

    /// Room to join after connecting
    #[arg(short, long, default_value = "general")]
    room: String,

    #[arg(long, env = "HIROBA_LOG_LEVEL", default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = ClientArgs::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let config = ClientConfig {
        url: args.url,
        username: args.username,
        room: args.room,
    };

    if let Err(e) = hiroba_client::run_client(config).await {
        tracing::error!("Client error: {}", e);
        eprintln!("{e}");
        std::process::exit(1);
    }
}
