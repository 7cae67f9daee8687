//! WebSocket broadcast relay library.
//!
//! Accepts WebSocket connections at `/`, echoes each message to its sender
//! and relays it to every other connected client together with the current
//! client count. Serves the browser client from a public directory.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;

// Re-export entry points
pub use config::ServerConfig;
pub use ui::{Server, ServerError, run_server};
