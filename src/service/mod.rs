//! Service layer: room coordination.
//!
//! [`RoomService`] resolves rooms through the [`super::domain::RoomRegistry`],
//! applies state transitions, and emits events through the
//! [`super::domain::EventBus`].

pub mod room_service;

pub use room_service::{RoomDetails, RoomService};
