//! Domain layer for the broadcast relay.
//!
//! This module contains the connection model, the outgoing envelope model and
//! the registry abstraction. It is independent of the WebSocket transport and
//! of the wire format.

pub mod entity;
pub mod error;
pub mod factory;
pub mod repository;
pub mod value_object;

pub use entity::{Connection, Envelope, EnvelopeKind};
pub use error::RegistryError;
pub use factory::ConnectionIdFactory;
pub use repository::{ConnectionRegistry, Greeting, OutboundSender, Recipient, RegistrySnapshot};
#[cfg(test)]
pub use repository::MockConnectionRegistry;
pub use value_object::{ConnectionId, MessageText, Timestamp};
