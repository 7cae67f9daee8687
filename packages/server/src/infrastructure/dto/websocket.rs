//! WebSocket message DTOs for the broadcast relay.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Envelope, EnvelopeKind};
use hiroba_shared::time::timestamp_to_iso8601;

/// Message type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    System,
    Echo,
    Broadcast,
    Error,
}

impl From<EnvelopeKind> for MessageType {
    fn from(kind: EnvelopeKind) -> Self {
        match kind {
            EnvelopeKind::System => Self::System,
            EnvelopeKind::Echo => Self::Echo,
            EnvelopeKind::Broadcast => Self::Broadcast,
            EnvelopeKind::Error => Self::Error,
        }
    }
}

/// Server-to-client envelope as it appears on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeDto {
    pub r#type: MessageType,
    pub message: String,
    /// ISO 8601
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_clients: Option<usize>,
}

impl From<&Envelope> for EnvelopeDto {
    fn from(envelope: &Envelope) -> Self {
        Self {
            r#type: envelope.kind.into(),
            message: envelope.message.clone(),
            timestamp: timestamp_to_iso8601(envelope.timestamp.value()),
            total_clients: envelope.total_clients,
        }
    }
}

/// Serialize a domain envelope into the JSON text of one frame.
pub fn encode_envelope(envelope: &Envelope) -> Result<String, serde_json::Error> {
    serde_json::to_string(&EnvelopeDto::from(envelope))
}

/// Why an inbound frame was rejected
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InboundParseError {
    #[error("payload is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("payload is not a JSON object")]
    NotAnObject,

    #[error("payload has no `text` field")]
    MissingText,

    #[error("`text` field is not a string")]
    TextNotString,

    #[error("binary payload is not valid UTF-8")]
    NonUtf8,
}

/// Client-to-server message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub text: String,
    /// ISO 8601, informational only
    pub timestamp: Option<String>,
}

impl InboundMessage {
    /// Parse the JSON text of one frame.
    ///
    /// Only `text` is required and it must be a string. A `timestamp` that is
    /// not a string is ignored rather than rejected.
    pub fn parse(raw: &str) -> Result<Self, InboundParseError> {
        let value: serde_json::Value = serde_json::from_str(raw)
            .map_err(|e| InboundParseError::InvalidJson(e.to_string()))?;

        let object = value.as_object().ok_or(InboundParseError::NotAnObject)?;
        let text = match object.get("text") {
            None => return Err(InboundParseError::MissingText),
            Some(serde_json::Value::String(text)) => text.clone(),
            Some(_) => return Err(InboundParseError::TextNotString),
        };
        let timestamp = object
            .get("timestamp")
            .and_then(|ts| ts.as_str())
            .map(str::to_string);

        Ok(Self { text, timestamp })
    }

    /// Parse a binary frame carrying UTF-8 JSON.
    pub fn parse_bytes(raw: &[u8]) -> Result<Self, InboundParseError> {
        let text = std::str::from_utf8(raw).map_err(|_| InboundParseError::NonUtf8)?;
        Self::parse(text)
    }
}
