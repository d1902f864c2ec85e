//! # planning-poker
//!
//! Real-time planning poker over REST and WebSocket.
//!
//! Participants join a named room, cast hidden votes from a fixed card
//! deck, and the room creator reveals the results (with the average of
//! numeric votes) or resets the round. All state is in memory.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)       create / join / look up rooms
//!     ├── WS Handler (ws/)           room protocol, per-room event filter
//!     │
//!     ├── RoomService (service/)     routes actions, logs outcomes
//!     ├── EventBus (domain/)         broadcast fan-out
//!     │
//!     ├── RoomRegistry (domain/)     room map + connection index
//!     └── Room (domain/)             session state machine
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod ws;

use axum::Router;
use axum::routing::get;

use crate::app_state::AppState;

/// Builds the full application router: REST endpoints plus `/ws`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws::handler::ws_handler))
        .with_state(state)
}
