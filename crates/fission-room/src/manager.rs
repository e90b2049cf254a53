//! Room manager: creates, tracks, and restores rooms.
//!
//! # Concurrency note
//!
//! The manager is not thread-safe by itself — it is owned by a single
//! task (or wrapped in a mutex one layer up). Per-room serialization
//! is *not* its job: each room actor already serializes its own
//! mutations, so once a caller holds a [`RoomHandle`] it never needs
//! the manager again to play.

use std::collections::HashMap;
use std::sync::Arc;

use fission_core::{Game, GameConfig, PlayerId, RoomId};
use fission_store::GameStore;
use rand::Rng;

use crate::room::spawn_room;
use crate::{RoomError, RoomHandle};

/// Default command channel size for room actors.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Manages all active rooms: the sole creator and destroyer of game
/// instances.
pub struct RoomManager<S: GameStore> {
    /// Active rooms, keyed by room id. Exactly one authoritative
    /// in-memory instance exists per room.
    rooms: HashMap<RoomId, RoomHandle>,
    store: Arc<S>,
    config: GameConfig,
}

impl<S: GameStore> RoomManager<S> {
    /// Creates a manager backed by `store`, spawning rooms with the
    /// default 6×9 / 8-player configuration.
    ///
    /// The store is shared: room actors clone the `Arc`, and callers
    /// may keep their own handle to it (win tallies, health checks).
    pub fn new(store: Arc<S>) -> Self {
        Self::with_config(store, GameConfig::default())
    }

    pub fn with_config(store: Arc<S>, config: GameConfig) -> Self {
        Self {
            rooms: HashMap::new(),
            store,
            config,
        }
    }

    /// Creates a new room with `host_id` as its sole player and
    /// returns the fresh room id.
    ///
    /// Creation is transactional with persistence: the initial
    /// snapshot is saved *before* the room is registered, so a store
    /// failure leaves no orphaned in-memory room behind.
    pub async fn create_room(
        &mut self,
        host_id: PlayerId,
        host_name: impl Into<String>,
    ) -> Result<RoomId, RoomError> {
        let room_id = RoomId::new(generate_room_id());
        let game = Game::new(
            room_id.clone(),
            host_id,
            host_name,
            &self.config,
        );

        self.store.save(&game.snapshot()).await?;

        let handle =
            spawn_room(game, Arc::clone(&self.store), DEFAULT_CHANNEL_SIZE);
        self.rooms.insert(room_id.clone(), handle);
        tracing::info!(%room_id, "room created");
        Ok(room_id)
    }

    /// Looks up a live room. Never creates or restores implicitly.
    pub fn room(&self, room_id: &RoomId) -> Result<RoomHandle, RoomError> {
        self.rooms
            .get(room_id)
            .cloned()
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))
    }

    /// Restores a persisted room into a fresh actor.
    ///
    /// Used after a process restart, when a client shows up with a
    /// room id the manager does not have live. Fails with `NotFound`
    /// if the store has no snapshot either; an already-live room is
    /// returned as-is.
    pub async fn restore_room(
        &mut self,
        room_id: &RoomId,
    ) -> Result<RoomHandle, RoomError> {
        if let Some(handle) = self.rooms.get(room_id) {
            return Ok(handle.clone());
        }

        let snapshot = self
            .store
            .load(room_id)
            .await?
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))?;

        let game = Game::from_snapshot(snapshot, self.config.max_players);
        let handle =
            spawn_room(game, Arc::clone(&self.store), DEFAULT_CHANNEL_SIZE);
        self.rooms.insert(room_id.clone(), handle.clone());
        tracing::info!(%room_id, "room restored from store");
        Ok(handle)
    }

    /// Shuts down a room and drops it from the map. The persisted
    /// snapshot is left in place.
    pub async fn destroy_room(
        &mut self,
        room_id: &RoomId,
    ) -> Result<(), RoomError> {
        let handle = self
            .rooms
            .remove(room_id)
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))?;

        let _ = handle.shutdown().await;
        tracing::info!(%room_id, "room destroyed");
        Ok(())
    }

    /// Number of live rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Ids of all live rooms.
    pub fn room_ids(&self) -> Vec<RoomId> {
        self.rooms.keys().cloned().collect()
    }
}

/// Generates a collision-resistant room identifier: 128 random bits
/// as lowercase hex.
fn generate_room_id() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 16] = rng.random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_ids_are_unique_and_hex() {
        let a = generate_room_id();
        let b = generate_room_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
