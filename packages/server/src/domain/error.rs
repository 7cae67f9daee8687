//! Domain layer error definitions.

use thiserror::Error;

use super::value_object::ConnectionId;

/// Errors related to the connection registry
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The connection is already a member of the registry
    #[error("Connection {0} is already registered")]
    DuplicateConnection(ConnectionId),

    /// The outbound channel of the connection is already closed
    #[error("Connection {0} is not open")]
    ConnectionClosed(ConnectionId),
}
