//! Error types for the game core.
//!
//! Every variant is a recoverable, caller-visible outcome — nothing
//! here is fatal to the process, and a rejected operation never leaves
//! partial state behind.

use crate::{GameStatus, PlayerId};

/// Errors from game-mutating operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// A move arrived while the game was not running.
    #[error("game is {0}, not accepting moves")]
    NotInProgress(GameStatus),

    /// A move arrived from a player other than the current-turn player.
    #[error("it is not {0}'s turn")]
    NotYourTurn(PlayerId),

    /// The move target lies outside the board.
    #[error("({row},{col}) is outside the board")]
    OutOfBounds { row: usize, col: usize },

    /// The roster already holds the configured maximum.
    #[error("room is full ({max} players)")]
    RoomFull { max: usize },

    /// The player is already on the roster.
    #[error("player {0} already joined")]
    DuplicatePlayer(PlayerId),

    /// The game has finished; the roster and board are frozen.
    #[error("game is already over")]
    GameOver,
}
