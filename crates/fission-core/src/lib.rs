//! Core engine for Fission, a multiplayer chain-reaction game.
//!
//! This crate is the pure heart of the stack: no async, no I/O, no
//! transport knowledge. The layers above (room actors, persistence,
//! delivery) drive it through a handful of types:
//!
//! - [`Board`] — the R×C grid of owned atom counts
//! - [`cascade::resolve`] — the chain-reaction simulator
//! - [`Game`] — roster, turn rotation, win detection
//! - [`EventBus`] — synchronous pub/sub announcing every state change
//! - [`GameSnapshot`] — the serializable export sent outward

mod board;
pub mod cascade;
mod error;
mod events;
mod game;
mod ids;
mod snapshot;

pub use board::{Board, Cell, DEFAULT_COLS, DEFAULT_ROWS};
pub use cascade::Explosion;
pub use error::GameError;
pub use events::{EventBus, EventCallback, EventKind, GameEvent};
pub use game::{Game, GameConfig, GameStatus, MoveOutcome};
pub use ids::{PlayerId, RoomId};
pub use snapshot::GameSnapshot;
