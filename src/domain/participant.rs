//! Room participants and the caller identity bound to a connection.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ConnectionId;

/// Nickname and role flags bound to a connection by the transport layer.
///
/// This is what a client asserts about itself when it opens its socket.
/// It is not authenticated: any client may claim any nickname and the
/// creator flag, and creator-gated actions only compare strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CallerIdentity {
    /// Display name chosen by the user.
    pub nickname: String,
    /// Observers watch the room but are not expected to vote.
    #[serde(default)]
    pub is_observer: bool,
    /// Claims to be the creator of the room.
    #[serde(default)]
    pub is_creator: bool,
}

impl CallerIdentity {
    /// Builds an identity with a trimmed nickname.
    #[must_use]
    pub fn new(nickname: &str, is_observer: bool, is_creator: bool) -> Self {
        Self {
            nickname: nickname.trim().to_string(),
            is_observer,
            is_creator,
        }
    }

    /// Returns `true` if the nickname is empty after trimming.
    #[must_use]
    pub fn has_blank_nickname(&self) -> bool {
        self.nickname.trim().is_empty()
    }
}

/// A connection seated in a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    /// Connection that owns this seat.
    pub connection_id: ConnectionId,
    /// Display name (not unique within a room).
    pub nickname: String,
    /// Fixed at join time.
    pub is_observer: bool,
    /// Structural flag fixed at join time; not used for authorization.
    pub is_creator: bool,
}

impl Participant {
    /// Seats `connection_id` with the flags from `identity`.
    #[must_use]
    pub fn new(connection_id: ConnectionId, identity: &CallerIdentity) -> Self {
        Self {
            connection_id,
            nickname: identity.nickname.clone(),
            is_observer: identity.is_observer,
            is_creator: identity.is_creator,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_trims_nickname() {
        let id = CallerIdentity::new("  Alice ", false, true);
        assert_eq!(id.nickname, "Alice");
        assert!(!id.has_blank_nickname());
    }

    #[test]
    fn blank_nickname_detected() {
        assert!(CallerIdentity::new("   ", false, false).has_blank_nickname());
        assert!(CallerIdentity::new("", true, false).has_blank_nickname());
    }

    #[test]
    fn identity_flags_default_to_false() {
        let id: CallerIdentity =
            serde_json::from_str(r#"{"nickname":"Bob"}"#).unwrap_or_else(|_| {
                CallerIdentity::new("", true, true)
            });
        assert_eq!(id, CallerIdentity::new("Bob", false, false));
    }

    #[test]
    fn participant_copies_identity_flags() {
        let conn = ConnectionId::new();
        let p = Participant::new(conn, &CallerIdentity::new("Carol", true, false));
        assert_eq!(p.connection_id, conn);
        assert_eq!(p.nickname, "Carol");
        assert!(p.is_observer);
        assert!(!p.is_creator);
    }
}
