//! Type-safe room identifier.
//!
//! [`RoomId`] is a short opaque token (8 lowercase hex characters taken
//! from a fresh UUID v4). It is short enough to share verbally or paste
//! into a chat, which is how rooms are usually handed out.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of hex characters in a generated room token.
pub const ROOM_ID_LEN: usize = 8;

/// Unique identifier for a planning poker room.
///
/// Generated once at room creation time and immutable thereafter. Used as
/// the key in [`super::RoomRegistry`], the event discriminator, and the
/// WebSocket subscription target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Generates a new random `RoomId`.
    #[must_use]
    pub fn generate() -> Self {
        let (head, _, _, _) = uuid::Uuid::new_v4().as_fields();
        Self(format!("{head:08x}"))
    }

    /// Wraps an existing token, e.g. one received from a client.
    ///
    /// No validation is done: unknown tokens simply fail registry lookups.
    #[must_use]
    pub fn from_token(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomId {
    fn from(token: &str) -> Self {
        Self::from_token(token)
    }
}

impl From<String> for RoomId {
    fn from(token: String) -> Self {
        Self(token)
    }
}
