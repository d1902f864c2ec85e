//! Outbound events produced by room transitions.
//!
//! Every applied transition yields zero or more [`RoomEvent`]s which the
//! service publishes through the [`super::EventBus`]. WebSocket connections
//! forward the ones whose room they have joined.

use std::collections::BTreeMap;

use serde::Serialize;

use super::RoomId;
use super::session_view::{ParticipantView, SessionView};

/// Event broadcast to every connection subscribed to a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RoomEvent {
    /// Full derived view of the room.
    SessionState {
        /// Room identifier.
        room_id: RoomId,
        /// Snapshot of the room.
        state: SessionView,
    },

    /// A connection took a seat in the room.
    UserJoined {
        /// Room identifier.
        room_id: RoomId,
        /// Nickname of the new participant.
        nickname: String,
        /// Whether the participant only observes.
        is_observer: bool,
        /// Creator flag asserted by the participant.
        is_creator: bool,
    },

    /// A participant cast or changed a vote.
    UserVoted {
        /// Room identifier.
        room_id: RoomId,
        /// Nickname of the voter.
        nickname: String,
        /// The vote value as sent.
        vote: String,
    },

    /// A participant withdrew a vote.
    VoteRescinded {
        /// Room identifier.
        room_id: RoomId,
        /// Nickname of the participant.
        nickname: String,
    },

    /// The creator revealed the votes.
    VotesRevealed {
        /// Room identifier.
        room_id: RoomId,
        /// Votes keyed by nickname.
        votes: BTreeMap<String, String>,
        /// Average of numeric votes, or `"N/A"`.
        average_vote: String,
        /// Participants with their voted flag.
        participants: Vec<ParticipantView>,
    },

    /// The creator cleared all votes and hid results.
    VotingReset {
        /// Room identifier.
        room_id: RoomId,
    },

    /// A participant disconnected.
    UserLeft {
        /// Room identifier.
        room_id: RoomId,
        /// Nickname of the departed participant.
        nickname: String,
    },
}

impl RoomEvent {
    /// Returns the room this event belongs to.
    #[must_use]
    pub fn room_id(&self) -> &RoomId {
        match self {
            Self::SessionState { room_id, .. }
            | Self::UserJoined { room_id, .. }
            | Self::UserVoted { room_id, .. }
            | Self::VoteRescinded { room_id, .. }
            | Self::VotesRevealed { room_id, .. }
            | Self::VotingReset { room_id }
            | Self::UserLeft { room_id, .. } => room_id,
        }
    }

    /// Returns the wire name of the event.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::SessionState { .. } => "session_state",
            Self::UserJoined { .. } => "user_joined",
            Self::UserVoted { .. } => "user_voted",
            Self::VoteRescinded { .. } => "vote_rescinded",
            Self::VotesRevealed { .. } => "votes_revealed",
            Self::VotingReset { .. } => "voting_reset",
            Self::UserLeft { .. } => "user_left",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_event_tag() {
        let event = RoomEvent::UserVoted {
            room_id: RoomId::from("abcd1234"),
            nickname: "Bob".to_string(),
            vote: "5".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap_or_default();
        assert_eq!(json.get("event").and_then(|v| v.as_str()), Some("user_voted"));
        assert_eq!(json.get("room_id").and_then(|v| v.as_str()), Some("abcd1234"));
        assert_eq!(json.get("vote").and_then(|v| v.as_str()), Some("5"));
    }

    #[test]
    fn tag_matches_event_type_str() {
        let event = RoomEvent::VotingReset {
            room_id: RoomId::from("abcd1234"),
        };
        let json = serde_json::to_value(&event).unwrap_or_default();
        assert_eq!(
            json.get("event").and_then(|v| v.as_str()),
            Some(event.event_type_str())
        );
    }

    #[test]
    fn room_id_accessor() {
        let id = RoomId::from("feedf00d");
        let event = RoomEvent::UserLeft {
            room_id: id.clone(),
            nickname: "Alice".to_string(),
        };
        assert_eq!(event.room_id(), &id);
    }
}
