//! Handler modules for static files and the WebSocket endpoint.

pub mod static_files;
pub mod websocket;

// Re-export static file handlers
pub use static_files::{client_script, index, not_found, stylesheet};

// Re-export WebSocket handlers
pub use websocket::root_handler;
