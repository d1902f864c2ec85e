//! WebSocket layer: connection handling, message routing, subscriptions.
//!
//! The WebSocket endpoint at `/ws` carries the room protocol: clients send
//! `join`, `vote`, `rescind_vote`, `reveal_votes` and `reset_voting`
//! commands and receive the events of the room they joined.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
