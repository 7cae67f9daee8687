//! WebSocket relay server: HTTP routing, connection handling and shutdown.

mod error;
mod handler;
mod runner;
mod signal;
pub mod state;

pub use error::ServerError;
pub use runner::{Server, build_router, run_server};
