//! In-memory reference implementation of [`GameStore`].

use std::collections::HashMap;
use std::sync::Mutex;

use fission_core::{GameSnapshot, PlayerId, RoomId};

use crate::{GameStore, StoreError};

/// A `HashMap`-backed store.
///
/// Used by tests and demos, and good enough for single-process
/// deployments that can afford to lose history on restart. The locks
/// are plain `std` mutexes — no await ever happens while one is held.
#[derive(Default)]
pub struct MemoryStore {
    games: Mutex<HashMap<RoomId, GameSnapshot>>,
    wins: Mutex<HashMap<PlayerId, u64>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded win count for `player`.
    pub fn wins(&self, player: &PlayerId) -> u64 {
        self.wins
            .lock()
            .expect("wins lock poisoned")
            .get(player)
            .copied()
            .unwrap_or(0)
    }

    /// Number of persisted games.
    pub fn game_count(&self) -> usize {
        self.games.lock().expect("games lock poisoned").len()
    }
}

impl GameStore for MemoryStore {
    async fn save(&self, snapshot: &GameSnapshot) -> Result<(), StoreError> {
        tracing::debug!(room_id = %snapshot.room_id, "saving snapshot");
        self.games
            .lock()
            .expect("games lock poisoned")
            .insert(snapshot.room_id.clone(), snapshot.clone());
        Ok(())
    }

    async fn load(
        &self,
        room_id: &RoomId,
    ) -> Result<Option<GameSnapshot>, StoreError> {
        Ok(self
            .games
            .lock()
            .expect("games lock poisoned")
            .get(room_id)
            .cloned())
    }

    async fn record_win(&self, player: &PlayerId) -> Result<(), StoreError> {
        let mut wins = self.wins.lock().expect("wins lock poisoned");
        *wins.entry(player.clone()).or_insert(0) += 1;
        tracing::info!(%player, wins = wins[player], "win recorded");
        Ok(())
    }
}
