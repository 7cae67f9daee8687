//! Core domain models for the broadcast relay.

use std::net::SocketAddr;

use super::value_object::{ConnectionId, MessageText, Timestamp};

/// Welcome text sent directly to a newly opened connection
pub const WELCOME_MESSAGE: &str = "Welcome to the WebSocket server!";

/// Text broadcast to the other members when a connection opens
pub const JOINED_MESSAGE: &str = "A new user has joined the chat";

/// Text broadcast to the remaining members when a connection closes
pub const LEFT_MESSAGE: &str = "A user has left the chat";

/// Text sent back to a client whose payload could not be parsed
pub const INVALID_FORMAT_MESSAGE: &str = "Invalid message format";

/// Represents one open WebSocket connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    /// Handle identity
    pub id: ConnectionId,
    /// Remote address of the peer (diagnostic only)
    pub remote_addr: SocketAddr,
    /// Timestamp when the connection was accepted
    pub connected_at: Timestamp,
}

impl Connection {
    /// Create a new connection
    pub fn new(id: ConnectionId, remote_addr: SocketAddr, connected_at: Timestamp) -> Self {
        Self {
            id,
            remote_addr,
            connected_at,
        }
    }
}

/// Kind of an outgoing envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeKind {
    /// Membership notifications and the welcome message
    System,
    /// Sender's own message returned to it
    Echo,
    /// Another client's message
    Broadcast,
    /// Rejection of a malformed payload
    Error,
}

/// One structured message sent from the server to a client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub kind: EnvelopeKind,
    pub message: String,
    pub timestamp: Timestamp,
    /// Number of connected clients, when the envelope carries it
    pub total_clients: Option<usize>,
}

impl Envelope {
    fn new(
        kind: EnvelopeKind,
        message: impl Into<String>,
        timestamp: Timestamp,
        total_clients: Option<usize>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            timestamp,
            total_clients,
        }
    }

    /// Direct greeting for a connection that just opened
    pub fn welcome(total_clients: usize, timestamp: Timestamp) -> Self {
        Self::new(
            EnvelopeKind::System,
            WELCOME_MESSAGE,
            timestamp,
            Some(total_clients),
        )
    }

    /// Join announcement for the other members
    pub fn joined(total_clients: usize, timestamp: Timestamp) -> Self {
        Self::new(
            EnvelopeKind::System,
            JOINED_MESSAGE,
            timestamp,
            Some(total_clients),
        )
    }

    /// Departure announcement for the remaining members
    pub fn left(total_clients: usize, timestamp: Timestamp) -> Self {
        Self::new(
            EnvelopeKind::System,
            LEFT_MESSAGE,
            timestamp,
            Some(total_clients),
        )
    }

    /// Echo of the sender's own text. Carries no client count.
    pub fn echo(text: &MessageText, timestamp: Timestamp) -> Self {
        Self::new(
            EnvelopeKind::Echo,
            format!("Echo: {}", text.as_str()),
            timestamp,
            None,
        )
    }

    /// Relay of the sender's text to the other members
    pub fn broadcast(text: &MessageText, total_clients: usize, timestamp: Timestamp) -> Self {
        Self::new(
            EnvelopeKind::Broadcast,
            text.as_str(),
            timestamp,
            Some(total_clients),
        )
    }

    /// Rejection sent to the originating connection only
    pub fn error(reason: impl Into<String>, timestamp: Timestamp) -> Self {
        Self::new(EnvelopeKind::Error, reason, timestamp, None)
    }
}
