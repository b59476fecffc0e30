use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a message came from on the platform side.
///
/// Only `Direct` messages enter the conversation flow; group and
/// broadcast traffic is dropped silently at the engine boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Direct,
    Group,
    Broadcast,
}

/// An inbound message from the transport.
///
/// This is the engine's entire view of the platform: transports map
/// their library-specific payloads into this type and nothing else
/// crosses the boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    pub id: Uuid,
    /// Stable platform-specific sender ID (never a group identifier).
    pub sender_id: String,
    /// Message text content.
    pub text: String,
    pub origin: Origin,
    pub timestamp: DateTime<Utc>,
}

impl InboundMessage {
    /// Convenience constructor for a direct message.
    pub fn direct(sender_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender_id: sender_id.into(),
            text: text.into(),
            origin: Origin::Direct,
            timestamp: Utc::now(),
        }
    }
}
