//! Per-connection room subscription.
//!
//! Tracks which room a WebSocket client has joined and filters the shared
//! event stream down to that room's events.

use crate::domain::RoomId;

/// The room a single WebSocket connection currently listens to.
#[derive(Debug, Default)]
pub struct RoomSubscription {
    room_id: Option<RoomId>,
}

impl RoomSubscription {
    /// Creates a subscription that matches nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Switches the subscription to `room_id`, returning the previous room.
    pub fn enter(&mut self, room_id: RoomId) -> Option<RoomId> {
        self.room_id.replace(room_id)
    }

    /// Stops listening to any room.
    pub fn leave(&mut self) -> Option<RoomId> {
        self.room_id.take()
    }

    /// Returns `true` if events of `room_id` should be forwarded.
    #[must_use]
    pub fn matches(&self, room_id: &RoomId) -> bool {
        self.room_id.as_ref() == Some(room_id)
    }

    /// Returns the current room, if any.
    #[must_use]
    pub fn current(&self) -> Option<&RoomId> {
        self.room_id.as_ref()
    }
}
