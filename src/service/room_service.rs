//! Room service: routes client actions to rooms and emits events.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::points::is_standard_point;
use crate::domain::{
    CallerIdentity, ConnectionId, EventBus, Outcome, Room, RoomId, RoomRegistry, Transition,
};
use crate::error::PokerError;

/// Snapshot of a room for the lookup endpoint.
#[derive(Debug, Clone)]
pub struct RoomDetails {
    /// Room identifier.
    pub room_id: RoomId,
    /// Nickname the room was created with.
    pub creator_nickname: String,
    /// Creation timestamp.
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// Timestamp of the last applied transition.
    pub last_activity_at: chrono::DateTime<chrono::Utc>,
    /// Number of seated participants.
    pub participant_count: usize,
    /// Current derived view.
    pub state: crate::domain::SessionView,
}

/// Coordinator for every room operation.
///
/// Stateless itself: owns references to [`RoomRegistry`] for state and
/// [`EventBus`] for event emission. Every mutation follows the pattern:
/// resolve room → acquire its write lock → apply transition → publish
/// events → release. Events are published before the lock is released so
/// subscribers see them in mutation order.
///
/// Client actions never fail. Unknown rooms, wrong state and missing
/// authority come back as an [`Outcome`] and are logged.
#[derive(Debug, Clone)]
pub struct RoomService {
    registry: Arc<RoomRegistry>,
    event_bus: EventBus,
    prune_empty_rooms: bool,
}

impl RoomService {
    /// Creates a new `RoomService` that keeps idle rooms.
    #[must_use]
    pub fn new(registry: Arc<RoomRegistry>, event_bus: EventBus) -> Self {
        Self {
            registry,
            event_bus,
            prune_empty_rooms: false,
        }
    }

    /// Enables or disables removal of rooms whose last participant left.
    #[must_use]
    pub fn with_pruning(mut self, prune_empty_rooms: bool) -> Self {
        self.prune_empty_rooms = prune_empty_rooms;
        self
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Returns a reference to the inner [`RoomRegistry`].
    #[must_use]
    pub fn registry(&self) -> &Arc<RoomRegistry> {
        &self.registry
    }

    /// Creates an empty room owned by `creator_nickname`.
    ///
    /// # Errors
    ///
    /// Returns [`PokerError::NicknameRequired`] for a blank nickname, or
    /// [`PokerError::Internal`] if no unique room id could be allocated.
    pub async fn create_room(&self, creator_nickname: &str) -> Result<RoomId, PokerError> {
        let nickname = creator_nickname.trim();
        if nickname.is_empty() {
            return Err(PokerError::NicknameRequired);
        }
        let room_id = self.registry.create(nickname).await?;
        tracing::info!(%room_id, creator = nickname, "room created");
        Ok(room_id)
    }

    /// Checks that a room exists.
    ///
    /// # Errors
    ///
    /// Returns [`PokerError::RoomNotFound`] if it does not.
    pub async fn ensure_room(&self, room_id: &RoomId) -> Result<(), PokerError> {
        if self.registry.contains(room_id).await {
            Ok(())
        } else {
            Err(PokerError::RoomNotFound(room_id.clone()))
        }
    }

    /// Returns a snapshot of the room.
    ///
    /// # Errors
    ///
    /// Returns [`PokerError::RoomNotFound`] if the room does not exist.
    pub async fn room_details(&self, room_id: &RoomId) -> Result<RoomDetails, PokerError> {
        let room_lock = self.registry.get(room_id).await?;
        let room = room_lock.read().await;
        Ok(RoomDetails {
            room_id: room.room_id.clone(),
            creator_nickname: room.creator_nickname.clone(),
            created_at: room.created_at,
            last_activity_at: room.last_activity_at,
            participant_count: room.participant_count(),
            state: room.session_view(),
        })
    }

    /// Seats a connection in a room.
    ///
    /// A connection already seated elsewhere leaves that room first. A join
    /// for an unknown room is ignored and keeps the current seat.
    pub async fn join(
        &self,
        connection_id: ConnectionId,
        room_id: &RoomId,
        identity: &CallerIdentity,
    ) -> Outcome {
        let room_lock = match self.registry.get(room_id).await {
            Ok(lock) => lock,
            Err(err) => {
                tracing::debug!(%room_id, %connection_id, error = %err, "join for unknown room ignored");
                return Outcome::Ignored;
            }
        };

        if let Some(current) = self.registry.room_of(connection_id).await
            && &current != room_id
        {
            tracing::debug!(%connection_id, from = %current, to = %room_id, "switching rooms");
            let _ = self.disconnect(connection_id).await;
        }

        let outcome = self
            .apply_to(room_id, &room_lock, "join", |room| {
                room.join(connection_id, identity)
            })
            .await;
        if outcome == Outcome::Applied {
            let _ = self.registry.bind(connection_id, room_id.clone()).await;
            tracing::info!(
                %room_id,
                %connection_id,
                nickname = %identity.nickname,
                is_observer = identity.is_observer,
                is_creator = identity.is_creator,
                "participant joined"
            );
        }
        outcome
    }

    /// Records a vote for the calling connection.
    pub async fn vote(&self, connection_id: ConnectionId, room_id: &RoomId, vote: &str) -> Outcome {
        if !is_standard_point(vote) {
            tracing::debug!(%room_id, %connection_id, vote, "non-standard vote value");
        }
        self.apply(room_id, "vote", |room| room.vote(connection_id, vote))
            .await
    }

    /// Withdraws the calling connection's vote.
    pub async fn rescind_vote(&self, connection_id: ConnectionId, room_id: &RoomId) -> Outcome {
        self.apply(room_id, "rescind_vote", |room| room.rescind_vote(connection_id))
            .await
    }

    /// Reveals the votes if `caller` is the room's creator.
    pub async fn reveal_votes(&self, room_id: &RoomId, caller: &CallerIdentity) -> Outcome {
        self.apply(room_id, "reveal_votes", |room| room.reveal(caller))
            .await
    }

    /// Clears the votes if `caller` is the room's creator.
    pub async fn reset_voting(&self, room_id: &RoomId, caller: &CallerIdentity) -> Outcome {
        self.apply(room_id, "reset_voting", |room| room.reset(caller))
            .await
    }

    /// Removes a connection from whichever room it is seated in.
    pub async fn disconnect(&self, connection_id: ConnectionId) -> Outcome {
        let Some(room_id) = self.registry.unbind(connection_id).await else {
            tracing::debug!(%connection_id, "disconnect without a room");
            return Outcome::Ignored;
        };

        let mut left_empty = false;
        let outcome = self
            .apply(&room_id, "disconnect", |room| {
                let transition = room.leave(connection_id);
                left_empty = room.is_empty();
                transition
            })
            .await;

        if outcome == Outcome::Applied {
            tracing::info!(%room_id, %connection_id, "participant left");
        }
        if left_empty && self.prune_empty_rooms && self.registry.remove_if_empty(&room_id).await {
            tracing::info!(%room_id, "empty room pruned");
        }
        outcome
    }

    /// Applies `transition` to the room under its write lock and publishes
    /// the resulting events before releasing it.
    async fn apply<F>(&self, room_id: &RoomId, action: &'static str, transition: F) -> Outcome
    where
        F: FnOnce(&mut Room) -> Transition,
    {
        let room_lock = match self.registry.get(room_id).await {
            Ok(lock) => lock,
            Err(err) => {
                tracing::debug!(%room_id, action, error = %err, "action for unknown room ignored");
                return Outcome::Ignored;
            }
        };
        self.apply_to(room_id, &room_lock, action, transition).await
    }

    /// Runs `transition` on an already resolved room. A room pruned since
    /// it was resolved counts as unknown.
    async fn apply_to<F>(
        &self,
        room_id: &RoomId,
        room_lock: &RwLock<Room>,
        action: &'static str,
        transition: F,
    ) -> Outcome
    where
        F: FnOnce(&mut Room) -> Transition,
    {
        let mut room = room_lock.write().await;
        if room.is_closed() {
            tracing::debug!(%room_id, action, "action for pruned room ignored");
            return Outcome::Ignored;
        }
        let Transition { outcome, events } = transition(&mut *room);
        match outcome {
            Outcome::Applied => {
                tracing::debug!(%room_id, action, events = events.len(), "transition applied");
                self.event_bus.publish_all(events);
            }
            Outcome::Denied => {
                tracing::warn!(
                    %room_id,
                    action,
                    creator = %room.creator_nickname,
                    "creator-only action denied"
                );
            }
            Outcome::Ignored => {
                tracing::debug!(
                    %room_id,
                    action,
                    revealed = room.is_revealed(),
                    "action ignored in current state"
                );
            }
        }
        drop(room);
        outcome
    }
}
