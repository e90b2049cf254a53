//! Error types for the room layer.

use fission_core::{GameError, RoomId};
use fission_store::StoreError;

/// Errors that can occur during room operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room does not exist.
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// The room's command channel is full or closed.
    #[error("room {0} is unavailable")]
    Unavailable(RoomId),

    /// The game rejected the operation (wrong turn, full roster, ...).
    #[error(transparent)]
    Game(#[from] GameError),

    /// The persistence backend failed.
    ///
    /// For joins and moves this is surfaced after the in-memory state
    /// was already updated — the mutation stands, only its persistence
    /// lagged. Room creation is the exception: it fails atomically.
    #[error("persistence failed: {0}")]
    Store(#[from] StoreError),
}
