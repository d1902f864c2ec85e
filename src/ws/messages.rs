//! WebSocket message types: envelope, commands, and events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{RoomEvent, RoomId};

/// Top-level WebSocket message envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsMessage {
    /// Client-provided ID for commands; server-generated for events.
    #[serde(default)]
    pub id: String,
    /// Message type discriminator.
    #[serde(rename = "type")]
    pub msg_type: WsMessageType,
    /// ISO-8601 timestamp. Optional on inbound messages.
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    /// Variant-specific payload.
    pub payload: serde_json::Value,
}

impl WsMessage {
    /// Wraps a room event for delivery to a client.
    #[must_use]
    pub fn event(event: &RoomEvent) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            msg_type: WsMessageType::Event,
            timestamp: Utc::now(),
            payload: serde_json::to_value(event).unwrap_or_default(),
        }
    }

    /// Builds an error reply to the message with the given ID.
    #[must_use]
    pub fn error(id: impl Into<String>, code: u32, message: &str) -> Self {
        Self {
            id: id.into(),
            msg_type: WsMessageType::Error,
            timestamp: Utc::now(),
            payload: serde_json::json!({
                "code": code,
                "message": message,
            }),
        }
    }

    /// Serializes the envelope to JSON text.
    #[must_use]
    pub fn to_json(&self) -> Option<String> {
        serde_json::to_string(self).ok()
    }
}

/// Discriminator for WebSocket message types.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WsMessageType {
    /// Client → Server command.
    Command,
    /// Server → Client broadcast event.
    Event,
    /// Server → Client error.
    Error,
}

/// Commands that a client can send over WebSocket.
///
/// Each command names the room it targets; the acting identity is the
/// one bound to the connection at upgrade time.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum WsCommand {
    /// Take a seat in a room and start receiving its events.
    Join {
        /// Target room.
        room_id: RoomId,
    },
    /// Cast or change a vote.
    Vote {
        /// Target room.
        room_id: RoomId,
        /// Card value; any string is accepted.
        vote: String,
    },
    /// Withdraw the current vote.
    RescindVote {
        /// Target room.
        room_id: RoomId,
    },
    /// Reveal all votes (creator only).
    RevealVotes {
        /// Target room.
        room_id: RoomId,
    },
    /// Clear all votes (creator only).
    ResetVoting {
        /// Target room.
        room_id: RoomId,
    },
}

impl WsCommand {
    /// Returns the room the command targets.
    #[must_use]
    pub fn room_id(&self) -> &RoomId {
        match self {
            Self::Join { room_id }
            | Self::Vote { room_id, .. }
            | Self::RescindVote { room_id }
            | Self::RevealVotes { room_id }
            | Self::ResetVoting { room_id } => room_id,
        }
    }
}
