//! UseCase layer error definitions.

use thiserror::Error;

use crate::{
    domain::{ConnectionId, RegistryError},
    infrastructure::dto::websocket::InboundParseError,
};

/// Errors raised while delivering an envelope
#[derive(Debug, Error)]
pub enum BroadcastError {
    #[error("failed to encode envelope: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("connection {0} is not registered")]
    NotRegistered(ConnectionId),

    #[error("connection {0} is closed")]
    ConnectionClosed(ConnectionId),
}

/// Errors raised when a connection opens
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectError {
    #[error("failed to register connection: {0}")]
    Registry(#[from] RegistryError),
}

/// Errors raised while relaying an inbound message
#[derive(Debug, Error)]
pub enum SendMessageError {
    #[error("invalid message format: {0}")]
    InvalidFormat(InboundParseError),

    #[error(transparent)]
    Delivery(#[from] BroadcastError),
}

/// Errors raised when a connection closes
#[derive(Debug, Error)]
pub enum DisconnectError {
    #[error(transparent)]
    Delivery(#[from] BroadcastError),
}
