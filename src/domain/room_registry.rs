//! Process-wide room storage with per-room locking.
//!
//! [`RoomRegistry`] stores all live rooms in a `HashMap` where each room is
//! individually protected by a [`tokio::sync::RwLock`]. Mutations of one
//! room are serialized while different rooms proceed concurrently.
//!
//! A reverse index maps each connection to the room it has joined, so a
//! disconnect resolves its room directly instead of scanning every room.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::{ConnectionId, Room, RoomId};
use crate::error::PokerError;

/// Attempts at drawing an unused room token before giving up.
const MAX_ID_ATTEMPTS: usize = 8;

/// Central store for all live rooms.
///
/// # Concurrency
///
/// - Multiple tasks may read the same room concurrently.
/// - Writes to different rooms are concurrent.
/// - Writes to the same room are serialized.
///
/// Lock order is always outer map before a room lock. The membership index
/// may be taken while a room lock is held, never the reverse.
#[derive(Debug)]
pub struct RoomRegistry {
    rooms: RwLock<HashMap<RoomId, Arc<RwLock<Room>>>>,
    memberships: RwLock<HashMap<ConnectionId, RoomId>>,
}

impl RoomRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            memberships: RwLock::new(HashMap::new()),
        }
    }

    /// Creates an empty room owned by `creator_nickname` under a fresh
    /// token.
    ///
    /// # Errors
    ///
    /// Returns [`PokerError::Internal`] if every generated token collided
    /// with an existing room.
    pub async fn create(&self, creator_nickname: &str) -> Result<RoomId, PokerError> {
        let mut map = self.rooms.write().await;
        for _ in 0..MAX_ID_ATTEMPTS {
            let room_id = RoomId::generate();
            if map.contains_key(&room_id) {
                tracing::debug!(%room_id, "room token collision, retrying");
                continue;
            }
            let room = Room::new(room_id.clone(), creator_nickname);
            map.insert(room_id.clone(), Arc::new(RwLock::new(room)));
            return Ok(room_id);
        }
        Err(PokerError::Internal(
            "could not allocate a unique room id".to_string(),
        ))
    }

    /// Returns the room behind its per-room lock.
    ///
    /// # Errors
    ///
    /// Returns [`PokerError::RoomNotFound`] if no room with the given ID
    /// exists.
    pub async fn get(&self, room_id: &RoomId) -> Result<Arc<RwLock<Room>>, PokerError> {
        let map = self.rooms.read().await;
        map.get(room_id)
            .cloned()
            .ok_or_else(|| PokerError::RoomNotFound(room_id.clone()))
    }

    /// Returns `true` if the room exists.
    pub async fn contains(&self, room_id: &RoomId) -> bool {
        self.rooms.read().await.contains_key(room_id)
    }

    /// Removes a room if nobody is seated in it.
    ///
    /// The room is closed under its own write lock before it leaves the
    /// map, so tasks still holding its handle see it as gone.
    ///
    /// Returns `true` if the room was removed.
    pub async fn remove_if_empty(&self, room_id: &RoomId) -> bool {
        let mut map = self.rooms.write().await;
        let Some(room_lock) = map.get(room_id) else {
            return false;
        };
        let mut room = room_lock.write().await;
        if !room.is_empty() {
            return false;
        }
        room.close();
        drop(room);
        map.remove(room_id);
        true
    }

    /// Records that `connection_id` is seated in `room_id`.
    ///
    /// Returns the room the connection was previously bound to, if any.
    pub async fn bind(&self, connection_id: ConnectionId, room_id: RoomId) -> Option<RoomId> {
        self.memberships.write().await.insert(connection_id, room_id)
    }

    /// Forgets the room binding of `connection_id`.
    pub async fn unbind(&self, connection_id: ConnectionId) -> Option<RoomId> {
        self.memberships.write().await.remove(&connection_id)
    }

    /// Returns the room `connection_id` is seated in.
    pub async fn room_of(&self, connection_id: ConnectionId) -> Option<RoomId> {
        self.memberships.read().await.get(&connection_id).cloned()
    }

    /// Returns the number of rooms in the registry.
    pub async fn len(&self) -> usize {
        self.rooms.read().await.len()
    }

    /// Returns `true` if the registry contains no rooms.
    pub async fn is_empty(&self) -> bool {
        self.rooms.read().await.is_empty()
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::CallerIdentity;

    #[tokio::test]
    async fn create_and_get() {
        let registry = RoomRegistry::new();
        let Ok(id) = registry.create("Alice").await else {
            panic!("room creation failed");
        };

        let Ok(room_lock) = registry.get(&id).await else {
            panic!("room not found");
        };
        let room = room_lock.read().await;
        assert_eq!(room.creator_nickname, "Alice");
        assert!(room.is_empty());
        assert!(!room.is_revealed());
    }

    #[tokio::test]
    async fn get_unknown_returns_not_found() {
        let registry = RoomRegistry::new();
        let result = registry.get(&RoomId::from("nope0000")).await;
        assert!(matches!(result, Err(PokerError::RoomNotFound(_))));
    }

    #[tokio::test]
    async fn remove_if_empty_only_prunes_empty_rooms() {
        let registry = RoomRegistry::new();
        let Ok(id) = registry.create("Alice").await else {
            panic!("room creation failed");
        };
        let Ok(room_lock) = registry.get(&id).await else {
            panic!("room not found");
        };
        let conn = ConnectionId::new();
        room_lock
            .write()
            .await
            .join(conn, &CallerIdentity::new("Alice", false, true));

        assert!(!registry.remove_if_empty(&id).await);
        assert!(registry.contains(&id).await);

        room_lock.write().await.leave(conn);
        assert!(registry.remove_if_empty(&id).await);
        assert!(registry.is_empty().await);
        assert!(!registry.remove_if_empty(&id).await);
    }

    #[tokio::test]
    async fn pruned_room_is_closed_for_existing_handles() {
        let registry = RoomRegistry::new();
        let Ok(id) = registry.create("Alice").await else {
            panic!("room creation failed");
        };
        let Ok(room_lock) = registry.get(&id).await else {
            panic!("room not found");
        };
        assert!(!room_lock.read().await.is_closed());

        assert!(registry.remove_if_empty(&id).await);
        assert!(room_lock.read().await.is_closed());
    }

    #[tokio::test]
    async fn membership_index_round_trip() {
        let registry = RoomRegistry::new();
        let conn = ConnectionId::new();
        let first = RoomId::from("aaaa0000");
        let second = RoomId::from("bbbb0000");

        assert_eq!(registry.bind(conn, first.clone()).await, None);
        assert_eq!(registry.room_of(conn).await, Some(first.clone()));
        assert_eq!(registry.bind(conn, second.clone()).await, Some(first));
        assert_eq!(registry.unbind(conn).await, Some(second));
        assert_eq!(registry.room_of(conn).await, None);
    }

    #[tokio::test]
    async fn len_and_is_empty() {
        let registry = RoomRegistry::new();
        assert!(registry.is_empty().await);
        let _ = registry.create("Alice").await;
        let _ = registry.create("Bob").await;
        assert_eq!(registry.len().await, 2);
    }
}
