//! Room session state machine.
//!
//! A [`Room`] owns one room's participants, hidden votes, reveal flag and
//! creator nickname. Every mutation returns a [`Transition`] describing
//! whether it took effect and which [`RoomEvent`]s should be broadcast.
//!
//! Guard failures never surface as errors: a vote after reveal, a reveal
//! by someone other than the creator, or a leave from an unknown
//! connection all degrade to [`Outcome::Ignored`] or [`Outcome::Denied`]
//! with no events.
//!
//! # Invariants
//!
//! - Every key in `votes` is the connection of a seated participant.
//! - While `revealed` is set, votes cannot be cast or withdrawn.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};

use super::participant::{CallerIdentity, Participant};
use super::session_view::{ParticipantView, SessionView, format_average};
use super::{ConnectionId, RoomEvent, RoomId};

/// What a transition did to the room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The room changed.
    Applied,
    /// The caller lacks authority for a creator-gated action.
    Denied,
    /// The action is not valid in the current state and was dropped.
    Ignored,
}

impl Outcome {
    /// Lowercase name for logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Denied => "denied",
            Self::Ignored => "ignored",
        }
    }
}

/// Result of a room mutation: the outcome plus events to broadcast in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// What happened.
    pub outcome: Outcome,
    /// Events to publish, in order. Empty unless `outcome` is `Applied`.
    pub events: Vec<RoomEvent>,
}

impl Transition {
    fn applied(events: Vec<RoomEvent>) -> Self {
        Self {
            outcome: Outcome::Applied,
            events,
        }
    }

    fn denied() -> Self {
        Self {
            outcome: Outcome::Denied,
            events: Vec::new(),
        }
    }

    fn ignored() -> Self {
        Self {
            outcome: Outcome::Ignored,
            events: Vec::new(),
        }
    }

    /// Returns `true` if the transition changed the room.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        self.outcome == Outcome::Applied
    }
}

/// A single planning poker room.
#[derive(Debug)]
pub struct Room {
    /// Room identifier (immutable after creation).
    pub room_id: RoomId,

    /// Nickname captured when the room was created. Reveal and reset are
    /// allowed for any caller asserting this nickname and the creator flag.
    pub creator_nickname: String,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Timestamp of the last applied transition.
    pub last_activity_at: DateTime<Utc>,

    creator_connection: Option<ConnectionId>,
    revealed: bool,
    participants: Vec<Participant>,
    votes: HashMap<ConnectionId, String>,
    closed: bool,
}

impl Room {
    /// Creates an empty, unrevealed room.
    #[must_use]
    pub fn new(room_id: RoomId, creator_nickname: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            room_id,
            creator_nickname: creator_nickname.into(),
            created_at: now,
            last_activity_at: now,
            creator_connection: None,
            revealed: false,
            participants: Vec::new(),
            votes: HashMap::new(),
            closed: false,
        }
    }

    /// Seats `connection_id` in the room, replacing any previous seat held
    /// by the same connection (its join position and vote are kept).
    ///
    /// A creator claim makes this connection the current creator
    /// connection; the last claimant wins.
    pub fn join(&mut self, connection_id: ConnectionId, identity: &CallerIdentity) -> Transition {
        let participant = Participant::new(connection_id, identity);
        match self.seat_mut(connection_id) {
            Some(seat) => *seat = participant,
            None => self.participants.push(participant),
        }
        if identity.is_creator {
            self.creator_connection = Some(connection_id);
        }
        self.touch();

        Transition::applied(vec![
            self.session_state(),
            RoomEvent::UserJoined {
                room_id: self.room_id.clone(),
                nickname: identity.nickname.clone(),
                is_observer: identity.is_observer,
                is_creator: identity.is_creator,
            },
        ])
    }

    /// Records or replaces the vote of `connection_id`.
    ///
    /// Ignored once votes are revealed or when the connection has no seat.
    /// A `session_state` follows the `user_voted` event only when this vote
    /// completes the round.
    pub fn vote(&mut self, connection_id: ConnectionId, vote: &str) -> Transition {
        if self.revealed {
            return Transition::ignored();
        }
        let Some(nickname) = self.seat(connection_id).map(|p| p.nickname.clone()) else {
            return Transition::ignored();
        };

        self.votes.insert(connection_id, vote.to_string());
        self.touch();

        let mut events = vec![RoomEvent::UserVoted {
            room_id: self.room_id.clone(),
            nickname,
            vote: vote.to_string(),
        }];
        if self.all_voted() {
            events.push(self.session_state());
        }
        Transition::applied(events)
    }

    /// Withdraws the vote of `connection_id`.
    ///
    /// Ignored once votes are revealed or when there is no vote to remove.
    pub fn rescind_vote(&mut self, connection_id: ConnectionId) -> Transition {
        if self.revealed || self.votes.remove(&connection_id).is_none() {
            return Transition::ignored();
        }
        self.touch();

        let nickname = self
            .seat(connection_id)
            .map(|p| p.nickname.clone())
            .unwrap_or_default();
        Transition::applied(vec![
            RoomEvent::VoteRescinded {
                room_id: self.room_id.clone(),
                nickname,
            },
            self.session_state(),
        ])
    }

    /// Reveals all votes. Creator-gated.
    pub fn reveal(&mut self, caller: &CallerIdentity) -> Transition {
        if !self.is_authorized(caller) {
            return Transition::denied();
        }
        self.revealed = true;
        self.touch();

        let state = self.session_view();
        let revealed = RoomEvent::VotesRevealed {
            room_id: self.room_id.clone(),
            votes: self.votes_by_nickname(),
            average_vote: self.average_vote(),
            participants: state.participants.clone(),
        };
        Transition::applied(vec![
            revealed,
            RoomEvent::SessionState {
                room_id: self.room_id.clone(),
                state,
            },
        ])
    }

    /// Clears every vote and hides results again. Creator-gated.
    pub fn reset(&mut self, caller: &CallerIdentity) -> Transition {
        if !self.is_authorized(caller) {
            return Transition::denied();
        }
        self.votes.clear();
        self.revealed = false;
        self.touch();

        Transition::applied(vec![RoomEvent::VotingReset {
            room_id: self.room_id.clone(),
        }])
    }

    /// Removes the seat and vote of a disconnected connection.
    ///
    /// When the room is left empty there is nobody to notify and no events
    /// are produced.
    pub fn leave(&mut self, connection_id: ConnectionId) -> Transition {
        let Some(index) = self
            .participants
            .iter()
            .position(|p| p.connection_id == connection_id)
        else {
            return Transition::ignored();
        };
        let departed = self.participants.remove(index);
        self.votes.remove(&connection_id);
        if self.creator_connection == Some(connection_id) {
            self.creator_connection = None;
        }
        self.touch();

        if self.participants.is_empty() {
            return Transition::applied(Vec::new());
        }
        Transition::applied(vec![
            self.session_state(),
            RoomEvent::UserLeft {
                room_id: self.room_id.clone(),
                nickname: departed.nickname,
            },
        ])
    }

    /// Creator check: the caller must claim the creator flag and carry the
    /// nickname the room was created with.
    #[must_use]
    pub fn is_authorized(&self, caller: &CallerIdentity) -> bool {
        caller.is_creator && caller.nickname == self.creator_nickname
    }

    /// `true` when at least one non-observer is seated and all of them
    /// have voted.
    #[must_use]
    pub fn all_voted(&self) -> bool {
        let mut voters = self.participants.iter().filter(|p| !p.is_observer).peekable();
        voters.peek().is_some() && voters.all(|p| self.votes.contains_key(&p.connection_id))
    }

    /// Computes the current [`SessionView`].
    #[must_use]
    pub fn session_view(&self) -> SessionView {
        let participants = self
            .participants
            .iter()
            .map(|p| ParticipantView {
                nickname: p.nickname.clone(),
                is_observer: p.is_observer,
                has_voted: self.votes.contains_key(&p.connection_id),
                is_creator: p.is_creator,
            })
            .collect();

        let (votes, average_vote) = if self.revealed {
            (Some(self.votes_by_nickname()), Some(self.average_vote()))
        } else {
            (None, None)
        };

        SessionView {
            participants,
            all_voted: self.all_voted(),
            revealed: self.revealed,
            votes,
            average_vote,
        }
    }

    /// Votes keyed by nickname, in join order. A later participant sharing
    /// a nickname overwrites an earlier one.
    #[must_use]
    pub fn votes_by_nickname(&self) -> BTreeMap<String, String> {
        self.participants
            .iter()
            .filter_map(|p| {
                self.votes
                    .get(&p.connection_id)
                    .map(|vote| (p.nickname.clone(), vote.clone()))
            })
            .collect()
    }

    /// Formatted average over every recorded vote.
    #[must_use]
    pub fn average_vote(&self) -> String {
        format_average(self.votes.values().map(String::as_str))
    }

    /// Whether votes are currently revealed.
    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Connection that most recently joined with a creator claim, if it is
    /// still connected.
    #[must_use]
    pub fn creator_connection(&self) -> Option<ConnectionId> {
        self.creator_connection
    }

    /// Returns the seat held by `connection_id`.
    #[must_use]
    pub fn seat(&self, connection_id: ConnectionId) -> Option<&Participant> {
        self.participants
            .iter()
            .find(|p| p.connection_id == connection_id)
    }

    /// Returns the vote recorded for `connection_id`.
    #[must_use]
    pub fn vote_of(&self, connection_id: ConnectionId) -> Option<&str> {
        self.votes.get(&connection_id).map(String::as_str)
    }

    /// Participants in join order.
    #[must_use]
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Number of seated participants.
    #[must_use]
    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    /// Number of recorded votes.
    #[must_use]
    pub fn vote_count(&self) -> usize {
        self.votes.len()
    }

    /// Returns `true` if nobody is seated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Marks the room as removed from the registry.
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Returns `true` once the room has been removed from the registry.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn seat_mut(&mut self, connection_id: ConnectionId) -> Option<&mut Participant> {
        self.participants
            .iter_mut()
            .find(|p| p.connection_id == connection_id)
    }

    fn session_state(&self) -> RoomEvent {
        RoomEvent::SessionState {
            room_id: self.room_id.clone(),
            state: self.session_view(),
        }
    }

    fn touch(&mut self) {
        self.last_activity_at = Utc::now();
    }
}
