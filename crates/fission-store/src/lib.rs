//! Persistence contract for Fission.
//!
//! The core never talks to a database directly. Instead, the room
//! layer holds a [`GameStore`] — snapshots go in after accepted
//! mutations, wins are recorded when a game finishes, and persisted
//! games can be loaded back for explicit room restoration.
//!
//! Fission does not ship a database backend; production deployments
//! implement [`GameStore`] over whatever engine they run (SQLite is
//! plenty for a single node). [`MemoryStore`] is the reference
//! implementation used by tests and demos.

#![allow(async_fn_in_trait)]

mod error;
mod memory;

pub use error::StoreError;
pub use memory::MemoryStore;

use fission_core::{GameSnapshot, PlayerId, RoomId};

/// A persistence backend for game snapshots and win tallies.
///
/// Methods return `Send` futures so implementations can be driven
/// from spawned room tasks. A failing store must never corrupt the
/// caller's in-memory state — errors are reported, not fatal.
pub trait GameStore: Send + Sync + 'static {
    /// Persists the full state of one game, replacing any previous
    /// snapshot for the same room.
    fn save(
        &self,
        snapshot: &GameSnapshot,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Loads the persisted snapshot for `room_id`, or `None` if the
    /// room was never saved.
    fn load(
        &self,
        room_id: &RoomId,
    ) -> impl std::future::Future<Output = Result<Option<GameSnapshot>, StoreError>> + Send;

    /// Increments the win tally for `player`. Called exactly once per
    /// finished game.
    fn record_win(
        &self,
        player: &PlayerId,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}
