//! Repository trait for the connection registry.
//!
//! The domain layer defines the interface; the infrastructure layer provides
//! the implementation (dependency inversion).

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{Connection, ConnectionId, RegistryError};

/// Channel carrying serialized envelopes to one connection's writer task
pub type OutboundSender = mpsc::UnboundedSender<String>;

/// Builds the first payload of a connection from the membership count it
/// joins with. `None` queues nothing.
pub type Greeting = Box<dyn FnOnce(usize) -> Option<String> + Send>;

/// One member of a registry snapshot
#[derive(Debug, Clone)]
pub struct Recipient {
    pub id: ConnectionId,
    pub sender: OutboundSender,
}

impl Recipient {
    /// A recipient is open while its writer task still holds the receiver.
    pub fn is_open(&self) -> bool {
        !self.sender.is_closed()
    }
}

/// Stable copy of the registry taken under a single lock
#[derive(Debug, Clone, Default)]
pub struct RegistrySnapshot {
    pub recipients: Vec<Recipient>,
    /// Membership count at the time of the snapshot
    pub total: usize,
}

/// Registry of open connections
///
/// Implementations must serialize mutations. Readers get copies, never a view
/// into live state.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// Insert a connection. Returns the membership count after insertion.
    async fn add(
        &self,
        connection: Connection,
        sender: OutboundSender,
    ) -> Result<usize, RegistryError>;

    /// Insert a connection and queue its greeting in the same critical
    /// section, so nothing broadcast to the new member can precede it.
    /// Returns the membership count after insertion.
    async fn admit(
        &self,
        connection: Connection,
        sender: OutboundSender,
        greeting: Greeting,
    ) -> Result<usize, RegistryError>;

    /// Remove a connection. Returns `false` if it was not a member.
    async fn remove(&self, id: &ConnectionId) -> bool;

    /// Current membership count
    async fn size(&self) -> usize;

    /// Copy of all members and their outbound channels
    async fn snapshot(&self) -> RegistrySnapshot;

    /// Outbound channel of one member
    async fn sender_of(&self, id: &ConnectionId) -> Option<OutboundSender>;

    /// All registered connections
    async fn connections(&self) -> Vec<Connection>;
}
