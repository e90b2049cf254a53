//! Serializable game snapshots.
//!
//! A snapshot is the full externally-visible state of one game,
//! exported after every accepted mutating operation. It is what the
//! persistence adapter stores and what notification sinks broadcast
//! to clients.

use serde::{Deserialize, Serialize};

use crate::{Board, GameStatus, PlayerId, RoomId};

/// The full serializable state of a game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub room_id: RoomId,
    /// Player ids in join order. Roster indices elsewhere (cell
    /// owners, `winner`) index into this list.
    pub players: Vec<PlayerId>,
    pub display_names: Vec<String>,
    pub board: Board,
    /// The id of the player whose turn it is.
    pub current_turn: PlayerId,
    pub status: GameStatus,
    /// Roster index of the winner once the game is finished.
    pub winner: Option<usize>,
}

impl GameSnapshot {
    /// The winner's player id, if the game has one.
    pub fn winner_id(&self) -> Option<&PlayerId> {
        self.winner.and_then(|idx| self.players.get(idx))
    }
}
