//! Error types for the persistence layer.

/// Errors surfaced by a [`GameStore`](crate::GameStore) backend.
///
/// A store failure is never fatal: callers surface it as a distinct
/// operation failure and the in-memory game state stays intact.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The backend rejected or failed the operation.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// Stored state exists but cannot be decoded.
    #[error("stored state is corrupt: {0}")]
    Corrupt(String),
}
