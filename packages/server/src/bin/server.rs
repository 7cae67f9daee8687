//! WebSocket broadcast relay server.
//!
//! Echoes each client's message back to it and relays it to all other
//! connected clients.
//!
//! Run with:
//! ```not_rust
//! PORT=8080 cargo run --bin hiroba-server
//! ```

use clap::Parser;
use hiroba_server::ServerConfig;
use hiroba_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let config = ServerConfig::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    // Run the server
    if let Err(e) = hiroba_server::run_server(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
