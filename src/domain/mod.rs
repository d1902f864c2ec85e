//! Domain layer: room state machine, registry, and event system.
//!
//! This module contains the in-memory model of planning poker rooms:
//! identifiers, participants, the room session state machine with its
//! derived view, the event bus for broadcasting state changes, and the
//! room registry for concurrent room storage.

pub mod connection_id;
pub mod event_bus;
pub mod participant;
pub mod points;
pub mod room;
pub mod room_event;
pub mod room_id;
pub mod room_registry;
pub mod session_view;

pub use connection_id::ConnectionId;
pub use event_bus::EventBus;
pub use participant::{CallerIdentity, Participant};
pub use points::VOTE_POINTS;
pub use room::{Outcome, Room, Transition};
pub use room_event::RoomEvent;
pub use room_id::RoomId;
pub use room_registry::RoomRegistry;
pub use session_view::{ParticipantView, SessionView};
