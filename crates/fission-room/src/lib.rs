//! Room lifecycle management for Fission.
//!
//! Each room runs as an isolated Tokio task (actor model) owning one
//! [`fission_core::Game`]. The actor's command queue is the per-room
//! lock: joins and moves on the same room are serialized, different
//! rooms proceed independently, and no external I/O failure can
//! corrupt a game's in-memory state.
//!
//! # Key types
//!
//! - [`RoomManager`] — creates, restores, and destroys rooms
//! - [`RoomHandle`] — send commands to a running room actor
//! - [`RoomNotice`] / [`NoticeSender`] — the outbound notification
//!   contract for delivery systems
//! - [`RoomError`] — everything that can go wrong, all recoverable

mod error;
mod manager;
mod room;

pub use error::RoomError;
pub use manager::RoomManager;
pub use room::{NoticeSender, RoomHandle, RoomNotice};
