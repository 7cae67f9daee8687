//! Broadcaster: fan-out of one envelope to registry members.

use std::sync::Arc;

use crate::{
    domain::{ConnectionId, ConnectionRegistry, Envelope, Recipient},
    infrastructure::dto::websocket::encode_envelope,
};

use super::error::BroadcastError;

/// Outcome of one fan-out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Recipients whose channel accepted the payload
    pub delivered: usize,
    /// Recipients that were closed or whose channel rejected the payload
    pub failed: usize,
}

/// Sends envelopes to registry members
pub struct Broadcaster {
    registry: Arc<dyn ConnectionRegistry>,
}

impl Broadcaster {
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Send `envelope` to every open member except `exclude`.
    ///
    /// The envelope is encoded once. Iteration runs over a registry snapshot,
    /// so members leaving mid-broadcast do not disturb it. A failed send is
    /// counted and skipped.
    pub async fn broadcast(
        &self,
        envelope: &Envelope,
        exclude: Option<&ConnectionId>,
    ) -> Result<BroadcastReport, BroadcastError> {
        let payload = encode_envelope(envelope)?;
        let snapshot = self.registry.snapshot().await;
        Ok(fan_out(&payload, &snapshot.recipients, exclude))
    }

    /// Send `envelope` to one member only.
    pub async fn send_to(
        &self,
        id: &ConnectionId,
        envelope: &Envelope,
    ) -> Result<(), BroadcastError> {
        let payload = encode_envelope(envelope)?;
        let sender = self
            .registry
            .sender_of(id)
            .await
            .ok_or(BroadcastError::NotRegistered(*id))?;
        sender
            .send(payload)
            .map_err(|_| BroadcastError::ConnectionClosed(*id))
    }
}

fn fan_out(
    payload: &str,
    recipients: &[Recipient],
    exclude: Option<&ConnectionId>,
) -> BroadcastReport {
    let mut report = BroadcastReport::default();
    for recipient in recipients {
        if exclude == Some(&recipient.id) {
            continue;
        }
        if !recipient.is_open() {
            report.failed += 1;
            continue;
        }
        if recipient.sender.send(payload.to_string()).is_err() {
            tracing::warn!(connection_id = %recipient.id, "Failed to send to connection");
            report.failed += 1;
        } else {
            report.delivered += 1;
        }
    }
    report
}
