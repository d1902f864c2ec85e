//! Broadcast channel for room events.
//!
//! [`EventBus`] wraps a [`tokio::sync::broadcast`] channel. Every applied
//! room transition publishes its [`RoomEvent`]s through the bus, and every
//! WebSocket connection subscribes once and filters by room.

use tokio::sync::broadcast;

use super::RoomEvent;

/// Broadcast bus for [`RoomEvent`]s.
///
/// Delivery is fire-and-forget: when the ring buffer is full the oldest
/// events are dropped for lagging receivers, and the next `session_state`
/// brings them back in sync.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<RoomEvent>,
}

impl EventBus {
    /// Creates a new `EventBus` with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of receivers that received the event.
    /// If there are no active receivers, the event is silently dropped.
    pub fn publish(&self, event: RoomEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Publishes a batch of events in order.
    pub fn publish_all(&self, events: impl IntoIterator<Item = RoomEvent>) {
        for event in events {
            let _ = self.publish(event);
        }
    }

    /// Creates a new receiver that will receive all future events.
    ///
    /// Each WebSocket connection should call this once on connect.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<RoomEvent> {
        self.sender.subscribe()
    }

    /// Returns the current number of active receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::RoomId;

    fn make_event(room_id: &RoomId) -> RoomEvent {
        RoomEvent::VotingReset {
            room_id: room_id.clone(),
        }
    }

    #[test]
    fn publish_without_receivers_returns_zero() {
        let bus = EventBus::new(16);
        let count = bus.publish(make_event(&RoomId::generate()));
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn subscriber_receives_event() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        let id = RoomId::generate();
        bus.publish(make_event(&id));

        let Ok(event) = rx.recv().await else {
            panic!("expected to receive event");
        };
        assert_eq!(event.room_id(), &id);
    }

    #[tokio::test]
    async fn publish_all_keeps_order() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();
        let id = RoomId::generate();

        bus.publish_all(vec![
            RoomEvent::UserLeft {
                room_id: id.clone(),
                nickname: "Bob".to_string(),
            },
            make_event(&id),
        ]);

        let Ok(first) = rx.recv().await else {
            panic!("missing first event");
        };
        let Ok(second) = rx.recv().await else {
            panic!("missing second event");
        };
        assert_eq!(first.event_type_str(), "user_left");
        assert_eq!(second.event_type_str(), "voting_reset");
    }

    #[tokio::test]
    async fn zero_capacity_still_delivers() {
        let bus = EventBus::new(0);
        let mut rx = bus.subscribe();
        let id = RoomId::generate();

        assert_eq!(bus.publish(make_event(&id)), 1);
        assert_eq!(bus.receiver_count(), 1);
        let Ok(event) = rx.recv().await else {
            panic!("expected to receive event");
        };
        assert_eq!(event.event_type_str(), "voting_reset");
    }
}
