//! Data transfer objects for the WebSocket wire format.

pub mod websocket;
