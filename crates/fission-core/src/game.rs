//! The game state machine: roster, turn rotation, win detection.
//!
//! A [`Game`] owns one [`Board`] and drives it through moves. Status
//! runs `NotStarted → InProgress → Finished` and never leaves
//! `Finished`. Players keep their slot in the turn rotation even with
//! zero cells — elimination is detected by the owned-cell count after
//! each move, never by removing anyone from the rotation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    cascade, Board, EventBus, EventCallback, EventKind, Explosion,
    GameError, GameEvent, GameSnapshot, PlayerId, RoomId,
};

/// Game-specific settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub rows: usize,
    pub cols: usize,
    /// Roster capacity, 2–8.
    pub max_players: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: crate::board::DEFAULT_ROWS,
            cols: crate::board::DEFAULT_COLS,
            max_players: 8,
        }
    }
}

/// Lifecycle status of a game.
///
/// ```text
/// NotStarted → InProgress → Finished
/// ```
///
/// `Finished` is terminal: the board and roster freeze, reads remain
/// available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    NotStarted,
    InProgress,
    Finished,
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotStarted => write!(f, "not_started"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Finished => write!(f, "finished"),
        }
    }
}

/// What an accepted move produced. The room layer uses `status` and
/// `winner` to trigger win recording.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveOutcome {
    /// Ordered explosion trace; empty if the move caused no cascade.
    pub explosions: Vec<Explosion>,
    pub status: GameStatus,
    pub winner: Option<PlayerId>,
}

/// One chain-reaction match: board, roster, turn order, and the event
/// bus that announces every accepted change.
pub struct Game {
    room_id: RoomId,
    players: Vec<PlayerId>,
    display_names: Vec<String>,
    board: Board,
    /// Roster index of the player whose turn it is.
    turn: usize,
    status: GameStatus,
    /// Roster index of the winner, set when the game finishes.
    winner: Option<usize>,
    /// True once the board has held cells of two or more players.
    /// Elimination cannot fire before then, otherwise the very first
    /// move would "win" an untouched board.
    contested: bool,
    max_players: usize,
    events: EventBus,
}

impl Game {
    /// Creates a game with the host as sole player.
    pub fn new(
        room_id: RoomId,
        host_id: PlayerId,
        host_name: impl Into<String>,
        config: &GameConfig,
    ) -> Self {
        assert!(
            (2..=8).contains(&config.max_players),
            "max_players must be 2-8"
        );
        Self {
            room_id,
            players: vec![host_id],
            display_names: vec![host_name.into()],
            board: Board::new(config.rows, config.cols),
            turn: 0,
            status: GameStatus::NotStarted,
            winner: None,
            contested: false,
            max_players: config.max_players,
            events: EventBus::new(),
        }
    }

    /// Rebuilds a live game from a persisted snapshot.
    ///
    /// Subscriptions are not part of the snapshot; callers re-attach
    /// their sinks after restoring. An unknown `current_turn` id falls
    /// back to the host's slot.
    pub fn from_snapshot(snapshot: GameSnapshot, max_players: usize) -> Self {
        let turn = snapshot
            .players
            .iter()
            .position(|p| *p == snapshot.current_turn)
            .unwrap_or(0);
        // Derived, not persisted: an in-progress game is contested
        // exactly when two or more players currently own cells.
        let contested = snapshot
            .board
            .owned_counts(snapshot.players.len())
            .iter()
            .filter(|&&c| c > 0)
            .count()
            >= 2;
        Self {
            room_id: snapshot.room_id,
            players: snapshot.players,
            display_names: snapshot.display_names,
            board: snapshot.board,
            turn,
            status: snapshot.status,
            winner: snapshot.winner,
            contested,
            max_players,
            events: EventBus::new(),
        }
    }

    /// Registers a callback for events of `kind`.
    pub fn subscribe(&mut self, kind: EventKind, callback: EventCallback) {
        self.events.subscribe(kind, callback);
    }

    /// Adds a player to the roster.
    ///
    /// Reaching two players while `NotStarted` starts the game. Fires
    /// a status-change event on success; a rejected join changes
    /// nothing and fires nothing.
    pub fn add_player(
        &mut self,
        player_id: PlayerId,
        display_name: impl Into<String>,
    ) -> Result<(), GameError> {
        if self.status == GameStatus::Finished {
            return Err(GameError::GameOver);
        }
        if self.players.len() >= self.max_players {
            return Err(GameError::RoomFull {
                max: self.max_players,
            });
        }
        if self.players.contains(&player_id) {
            return Err(GameError::DuplicatePlayer(player_id));
        }

        self.players.push(player_id);
        self.display_names.push(display_name.into());

        if self.players.len() >= 2 && self.status == GameStatus::NotStarted {
            self.status = GameStatus::InProgress;
        }

        self.events
            .emit(&GameEvent::StatusChange(self.snapshot()));
        Ok(())
    }

    /// Applies one move: place an atom, resolve the cascade, detect
    /// elimination, rotate the turn.
    ///
    /// Rejections return an error with no state change. On acceptance
    /// a status-change event always fires, plus a chain-reaction event
    /// when the trace is non-empty.
    pub fn apply_move(
        &mut self,
        player_id: &PlayerId,
        row: usize,
        col: usize,
    ) -> Result<MoveOutcome, GameError> {
        if self.status != GameStatus::InProgress {
            return Err(GameError::NotInProgress(self.status));
        }
        let mover = self
            .players
            .iter()
            .position(|p| p == player_id)
            .filter(|idx| *idx == self.turn)
            .ok_or_else(|| GameError::NotYourTurn(player_id.clone()))?;
        if !self.board.in_bounds(row, col) {
            return Err(GameError::OutOfBounds { row, col });
        }

        let mover = mover as u8;
        self.board.place_atom(row, col, mover);
        let explosions = cascade::resolve(&mut self.board, row, col, mover);

        // A player with zero cells stays in the rotation; the game
        // ends only when the board says at most one player scores.
        let counts = self.board.owned_counts(self.players.len());
        let active = counts.iter().filter(|&&c| c > 0).count();
        if active >= 2 {
            self.contested = true;
        } else if self.contested && self.players.len() >= 2 {
            self.status = GameStatus::Finished;
            self.winner = counts.iter().position(|&c| c > 0);
        }

        if self.status == GameStatus::InProgress {
            self.turn = (self.turn + 1) % self.players.len();
        }

        self.events
            .emit(&GameEvent::StatusChange(self.snapshot()));
        if !explosions.is_empty() {
            self.events
                .emit(&GameEvent::ChainReaction(explosions.clone()));
        }

        Ok(MoveOutcome {
            explosions,
            status: self.status,
            winner: self.winner_id().cloned(),
        })
    }

    /// Exports the full serializable state.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            room_id: self.room_id.clone(),
            players: self.players.clone(),
            display_names: self.display_names.clone(),
            board: self.board.clone(),
            current_turn: self.players[self.turn].clone(),
            status: self.status,
            winner: self.winner,
        }
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn players(&self) -> &[PlayerId] {
        &self.players
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn max_players(&self) -> usize {
        self.max_players
    }

    /// The player whose turn it is.
    pub fn current_player(&self) -> &PlayerId {
        &self.players[self.turn]
    }

    /// The winner's id once the game is finished.
    pub fn winner_id(&self) -> Option<&PlayerId> {
        self.winner.and_then(|idx| self.players.get(idx))
    }

    pub fn board(&self) -> &Board {
        &self.board
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn pid(s: &str) -> PlayerId {
        PlayerId::new(s)
    }

    fn two_player_game() -> Game {
        let mut game = Game::new(
            RoomId::new("r1"),
            pid("a"),
            "Alice",
            &GameConfig::default(),
        );
        game.add_player(pid("b"), "Bob").unwrap();
        game
    }

    #[test]
    fn test_new_game_waits_for_second_player() {
        let game = Game::new(
            RoomId::new("r1"),
            pid("a"),
            "Alice",
            &GameConfig::default(),
        );
        assert_eq!(game.status(), GameStatus::NotStarted);
        assert_eq!(game.current_player(), &pid("a"));
    }

    #[test]
    fn test_second_join_starts_the_game() {
        let game = two_player_game();
        assert_eq!(game.status(), GameStatus::InProgress);
        assert_eq!(game.player_count(), 2);
        // First move belongs to the host.
        assert_eq!(game.current_player(), &pid("a"));
    }

    #[test]
    fn test_duplicate_join_rejected() {
        let mut game = two_player_game();
        let err = game.add_player(pid("a"), "Alice again").unwrap_err();
        assert_eq!(err, GameError::DuplicatePlayer(pid("a")));
        assert_eq!(game.player_count(), 2);
    }

    #[test]
    fn test_ninth_player_rejected_at_capacity_eight() {
        let mut game = Game::new(
            RoomId::new("r1"),
            pid("p0"),
            "P0",
            &GameConfig::default(),
        );
        for i in 1..8 {
            game.add_player(pid(&format!("p{i}")), format!("P{i}"))
                .unwrap();
        }
        assert_eq!(game.player_count(), 8);

        let err = game.add_player(pid("p8"), "P8").unwrap_err();
        assert_eq!(err, GameError::RoomFull { max: 8 });
        assert_eq!(game.player_count(), 8, "roster unchanged");
    }

    #[test]
    fn test_move_rejected_before_start() {
        let mut game = Game::new(
            RoomId::new("r1"),
            pid("a"),
            "Alice",
            &GameConfig::default(),
        );
        let err = game.apply_move(&pid("a"), 0, 0).unwrap_err();
        assert_eq!(err, GameError::NotInProgress(GameStatus::NotStarted));
    }

    #[test]
    fn test_out_of_turn_move_rejected_without_state_change() {
        let mut game = two_player_game();
        let before = game.snapshot();

        let err = game.apply_move(&pid("b"), 0, 0).unwrap_err();
        assert_eq!(err, GameError::NotYourTurn(pid("b")));
        assert_eq!(game.snapshot(), before);

        // Unknown players are rejected the same way.
        let err = game.apply_move(&pid("ghost"), 0, 0).unwrap_err();
        assert_eq!(err, GameError::NotYourTurn(pid("ghost")));
        assert_eq!(game.snapshot(), before);
    }

    #[test]
    fn test_out_of_bounds_move_rejected() {
        let mut game = two_player_game();
        let err = game.apply_move(&pid("a"), 6, 0).unwrap_err();
        assert_eq!(err, GameError::OutOfBounds { row: 6, col: 0 });
        let err = game.apply_move(&pid("a"), 0, 9).unwrap_err();
        assert_eq!(err, GameError::OutOfBounds { row: 0, col: 9 });
    }

    #[test]
    fn test_turns_strictly_alternate_for_two_players() {
        let mut game = two_player_game();
        // Far-apart cells so no cascade ends the game early.
        let moves = [
            ("a", 0, 0),
            ("b", 5, 8),
            ("a", 2, 2),
            ("b", 3, 6),
            ("a", 2, 3),
            ("b", 3, 5),
        ];
        for (who, row, col) in moves {
            assert_eq!(game.current_player(), &pid(who));
            game.apply_move(&pid(who), row, col).unwrap();
        }
        assert_eq!(game.status(), GameStatus::InProgress);
    }

    #[test]
    fn test_turn_wraps_around_roster_in_join_order() {
        let mut game = two_player_game();
        game.add_player(pid("c"), "Cara").unwrap();

        game.apply_move(&pid("a"), 0, 0).unwrap();
        assert_eq!(game.current_player(), &pid("b"));
        game.apply_move(&pid("b"), 2, 4).unwrap();
        assert_eq!(game.current_player(), &pid("c"));
        game.apply_move(&pid("c"), 5, 8).unwrap();
        assert_eq!(game.current_player(), &pid("a"));
    }

    #[test]
    fn test_first_move_does_not_win_an_uncontested_board() {
        // Right after the first move only the mover owns cells; that
        // must not count as an elimination.
        let mut game = two_player_game();
        let outcome = game.apply_move(&pid("a"), 3, 3).unwrap();
        assert_eq!(outcome.status, GameStatus::InProgress);
        assert_eq!(outcome.winner, None);
        assert_eq!(game.current_player(), &pid("b"));
    }

    #[test]
    fn test_placing_on_opponent_cell_recaptures_it() {
        let mut game = two_player_game();
        game.apply_move(&pid("a"), 3, 3).unwrap();
        // Placing onto A's cell is legal and hands it to B.
        game.apply_move(&pid("b"), 3, 3).unwrap();
        assert_eq!(game.board().cell(3, 3).owner, Some(1));
        assert_eq!(game.board().cell(3, 3).atoms, 2);
    }

    #[test]
    fn test_single_atom_placement_conserves_atom_count() {
        let mut game = two_player_game();
        let before = game.board().total_atoms();
        game.apply_move(&pid("a"), 3, 3).unwrap();
        assert_eq!(game.board().total_atoms(), before + 1);
    }

    #[test]
    fn test_corner_explosion_scenario() {
        // Host A and B join; A loads the (0,0) corner to critical
        // mass 2 across alternating turns. The explosion feeds one
        // A-owned atom into each corner neighbor.
        let mut game = two_player_game();

        game.apply_move(&pid("a"), 0, 0).unwrap();
        game.apply_move(&pid("b"), 5, 8).unwrap();
        let outcome = game.apply_move(&pid("a"), 0, 0).unwrap();

        assert_eq!(
            outcome.explosions,
            vec![Explosion { row: 0, col: 0, player: 0 }]
        );
        assert!(game.board().cell(0, 0).is_empty());
        assert_eq!(game.board().cell(0, 1).atoms, 1);
        assert_eq!(game.board().cell(0, 1).owner, Some(0));
        assert_eq!(game.board().cell(1, 0).atoms, 1);
        assert_eq!(game.board().cell(1, 0).owner, Some(0));
        // B still holds (5,8), so the game continues.
        assert_eq!(game.status(), GameStatus::InProgress);
    }

    #[test]
    fn test_elimination_finishes_game_with_winner() {
        // B's only cell sits next to A's corner; A's explosion
        // captures it, leaving B with zero cells.
        let mut game = two_player_game();

        game.apply_move(&pid("a"), 0, 0).unwrap();
        game.apply_move(&pid("b"), 0, 1).unwrap();
        let outcome = game.apply_move(&pid("a"), 0, 0).unwrap();

        assert_eq!(outcome.status, GameStatus::Finished);
        assert_eq!(outcome.winner, Some(pid("a")));
        assert_eq!(game.status(), GameStatus::Finished);
        assert_eq!(game.winner_id(), Some(&pid("a")));
    }

    #[test]
    fn test_no_moves_or_joins_after_finish() {
        let mut game = two_player_game();
        game.apply_move(&pid("a"), 0, 0).unwrap();
        game.apply_move(&pid("b"), 0, 1).unwrap();
        game.apply_move(&pid("a"), 0, 0).unwrap();
        assert_eq!(game.status(), GameStatus::Finished);

        let err = game.apply_move(&pid("b"), 3, 3).unwrap_err();
        assert_eq!(err, GameError::NotInProgress(GameStatus::Finished));

        let err = game.add_player(pid("c"), "Cara").unwrap_err();
        assert_eq!(err, GameError::GameOver);
    }

    #[test]
    fn test_status_change_fires_on_accepted_operations_only() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut game = Game::new(
            RoomId::new("r1"),
            pid("a"),
            "Alice",
            &GameConfig::default(),
        );
        let h = Arc::clone(&hits);
        game.subscribe(
            EventKind::StatusChange,
            Box::new(move |_| {
                h.fetch_add(1, Ordering::SeqCst);
            }),
        );

        game.add_player(pid("b"), "Bob").unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        // Rejected join fires nothing.
        let _ = game.add_player(pid("b"), "Bob");
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        game.apply_move(&pid("a"), 0, 0).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);

        // Rejected move fires nothing.
        let _ = game.apply_move(&pid("a"), 0, 0);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_chain_reaction_event_carries_the_trace() {
        let seen: Arc<Mutex<Vec<Explosion>>> = Arc::default();
        let mut game = two_player_game();
        let s = Arc::clone(&seen);
        game.subscribe(
            EventKind::ChainReaction,
            Box::new(move |event| {
                if let GameEvent::ChainReaction(trace) = event {
                    s.lock().unwrap().extend_from_slice(trace);
                }
            }),
        );

        game.apply_move(&pid("a"), 0, 0).unwrap();
        game.apply_move(&pid("b"), 5, 8).unwrap();
        assert!(seen.lock().unwrap().is_empty(), "no cascade yet");

        game.apply_move(&pid("a"), 0, 0).unwrap();
        assert_eq!(
            *seen.lock().unwrap(),
            vec![Explosion { row: 0, col: 0, player: 0 }]
        );
    }

    #[test]
    fn test_snapshot_reflects_turn_and_status() {
        let mut game = two_player_game();
        game.apply_move(&pid("a"), 0, 0).unwrap();

        let snap = game.snapshot();
        assert_eq!(snap.room_id, RoomId::new("r1"));
        assert_eq!(snap.current_turn, pid("b"));
        assert_eq!(snap.status, GameStatus::InProgress);
        assert_eq!(snap.board.cell(0, 0).atoms, 1);
    }

    #[test]
    fn test_from_snapshot_restores_play() {
        let mut game = two_player_game();
        game.apply_move(&pid("a"), 0, 0).unwrap();
        let snap = game.snapshot();

        let mut restored = Game::from_snapshot(snap, 8);
        assert_eq!(restored.status(), GameStatus::InProgress);
        assert_eq!(restored.current_player(), &pid("b"));
        // Play continues where it left off.
        restored.apply_move(&pid("b"), 5, 8).unwrap();
        assert_eq!(restored.current_player(), &pid("a"));
    }
}
