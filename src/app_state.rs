//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::{EventBus, RoomRegistry};
use crate::service::RoomService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Room service for all room coordination.
    pub room_service: Arc<RoomService>,
    /// Event bus for WebSocket subscriptions.
    pub event_bus: EventBus,
}

impl AppState {
    /// Wires a fresh registry, event bus and service together.
    #[must_use]
    pub fn new(event_bus_capacity: usize, prune_empty_rooms: bool) -> Self {
        let registry = Arc::new(RoomRegistry::new());
        let event_bus = EventBus::new(event_bus_capacity);
        let room_service =
            Arc::new(RoomService::new(registry, event_bus.clone()).with_pruning(prune_empty_rooms));
        Self {
            room_service,
            event_bus,
        }
    }
}
