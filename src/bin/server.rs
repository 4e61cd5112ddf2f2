//! Presence-and-messaging server for the peer support chat.
//!
//! Accepts WebSocket connections, routes public and private messages between
//! them, and persists history to SQLite.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin server
//! cargo run --bin server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;

use clap::Parser;
use peerchat::{
    common::{logger::setup_logger, time::SystemClock},
    server::{AppState, run_server},
    store::SqliteMessageStore,
};

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Presence and messaging server for the peer support chat", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// SQLite database URL for message history
    #[arg(long, default_value = "sqlite:peerchat.db?mode=rwc")]
    database_url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    let store = match SqliteMessageStore::connect(&args.database_url).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::error!("Failed to open message store at '{}': {}", args.database_url, e);
            std::process::exit(1);
        }
    };
    tracing::info!("Message store ready at '{}'", args.database_url);

    let state = Arc::new(AppState::new(store, Arc::new(SystemClock)));

    if let Err(e) = run_server(args.host, args.port, state).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
