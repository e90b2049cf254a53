//! Room actor: an isolated Tokio task that owns one game instance.
//!
//! Each room runs in its own task, communicating with the outside
//! world through an mpsc channel. The task is the room lock: all
//! mutating operations on a game are serialized through its command
//! queue, and different rooms never contend with each other.

use std::sync::Arc;

use fission_core::{
    EventKind, Explosion, Game, GameEvent, GameSnapshot, GameStatus,
    PlayerId, RoomId,
};
use fission_store::GameStore;
use tokio::sync::{mpsc, oneshot};

use crate::RoomError;

/// An outbound notification from a room to a registered sink.
///
/// Sinks are delivery systems (socket broadcasters, bot message
/// editors) and receive exactly the two event kinds the game emits.
#[derive(Debug, Clone)]
pub enum RoomNotice {
    /// Roster, turn, status, or board changed; full snapshot attached.
    Status(GameSnapshot),
    /// A move set off a cascade; ordered explosion trace attached.
    Chain(Vec<Explosion>),
}

/// Channel sender through which a sink receives [`RoomNotice`]s.
pub type NoticeSender = mpsc::UnboundedSender<RoomNotice>;

/// Commands sent to a room actor through its channel.
///
/// The `oneshot::Sender` in most variants is a reply channel — the
/// caller sends a command and awaits the response on it.
pub(crate) enum RoomCommand {
    /// Add a player to the game roster.
    Join {
        player_id: PlayerId,
        display_name: String,
        reply: oneshot::Sender<Result<GameSnapshot, RoomError>>,
    },

    /// Apply a move for a player.
    Move {
        player_id: PlayerId,
        row: usize,
        col: usize,
        reply: oneshot::Sender<Result<Vec<Explosion>, RoomError>>,
    },

    /// Register an outbound notification sink.
    Watch { sender: NoticeSender },

    /// Request a consistent snapshot of the game.
    Snapshot {
        reply: oneshot::Sender<GameSnapshot>,
    },

    /// Shut down the room.
    Shutdown,
}

/// Handle to a running room actor. Cheap to clone — it wraps an
/// `mpsc::Sender`. The `RoomManager` holds one per room.
#[derive(Clone)]
pub struct RoomHandle {
    room_id: RoomId,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    /// Returns the room's unique id.
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Adds a player to the room's game. Returns the post-join
    /// snapshot on success.
    pub async fn join(
        &self,
        player_id: PlayerId,
        display_name: impl Into<String>,
    ) -> Result<GameSnapshot, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Join {
                player_id,
                display_name: display_name.into(),
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))?
    }

    /// Applies a move and returns the explosion trace it produced.
    pub async fn play(
        &self,
        player_id: PlayerId,
        row: usize,
        col: usize,
    ) -> Result<Vec<Explosion>, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Move {
                player_id,
                row,
                col,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))?
    }

    /// Registers `sender` to receive this room's notifications
    /// (fire-and-forget).
    pub async fn watch(&self, sender: NoticeSender) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Watch { sender })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))
    }

    /// Requests a consistent, non-torn snapshot of the game.
    pub async fn snapshot(&self) -> Result<GameSnapshot, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Snapshot { reply: reply_tx })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))
    }

    /// Tells the room to shut down.
    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Shutdown)
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))
    }
}

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor<S: GameStore> {
    game: Game,
    store: Arc<S>,
    /// Registered notification sinks. Closed sinks are pruned on send.
    watchers: Vec<NoticeSender>,
    /// Events the game emitted through its bus, pending fan-out.
    events: mpsc::UnboundedReceiver<GameEvent>,
    receiver: mpsc::Receiver<RoomCommand>,
    /// Set when the finished game's win has been recorded; the
    /// recording call must happen exactly once per room.
    win_recorded: bool,
}

impl<S: GameStore> RoomActor<S> {
    /// Runs the actor loop, processing commands until shutdown or
    /// until every handle is dropped.
    async fn run(mut self) {
        let room_id = self.game.room_id().clone();
        tracing::info!(%room_id, "room actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoomCommand::Join {
                    player_id,
                    display_name,
                    reply,
                } => {
                    let result =
                        self.handle_join(player_id, display_name).await;
                    self.flush_events();
                    let _ = reply.send(result);
                }
                RoomCommand::Move {
                    player_id,
                    row,
                    col,
                    reply,
                } => {
                    let result = self.handle_move(player_id, row, col).await;
                    self.flush_events();
                    let _ = reply.send(result);
                }
                RoomCommand::Watch { sender } => {
                    self.watchers.push(sender);
                }
                RoomCommand::Snapshot { reply } => {
                    let _ = reply.send(self.game.snapshot());
                }
                RoomCommand::Shutdown => {
                    tracing::info!(%room_id, "room shutting down");
                    break;
                }
            }
        }

        tracing::info!(%room_id, "room actor stopped");
    }

    async fn handle_join(
        &mut self,
        player_id: PlayerId,
        display_name: String,
    ) -> Result<GameSnapshot, RoomError> {
        self.game.add_player(player_id.clone(), display_name)?;
        tracing::info!(
            room_id = %self.game.room_id(),
            %player_id,
            players = self.game.player_count(),
            "player joined"
        );

        let snapshot = self.game.snapshot();
        if let Err(e) = self.store.save(&snapshot).await {
            // Best-effort persistence: the join stands in memory, the
            // caller learns the save lagged.
            tracing::warn!(
                room_id = %self.game.room_id(),
                error = %e,
                "snapshot save failed after join"
            );
            return Err(e.into());
        }
        Ok(snapshot)
    }

    async fn handle_move(
        &mut self,
        player_id: PlayerId,
        row: usize,
        col: usize,
    ) -> Result<Vec<Explosion>, RoomError> {
        let outcome = self.game.apply_move(&player_id, row, col)?;
        tracing::debug!(
            room_id = %self.game.room_id(),
            %player_id,
            row,
            col,
            explosions = outcome.explosions.len(),
            "move applied"
        );

        if outcome.status == GameStatus::Finished && !self.win_recorded {
            self.win_recorded = true;
            if let Some(winner) = &outcome.winner {
                tracing::info!(
                    room_id = %self.game.room_id(),
                    %winner,
                    "game finished"
                );
                if let Err(e) = self.store.record_win(winner).await {
                    tracing::warn!(
                        room_id = %self.game.room_id(),
                        error = %e,
                        "failed to record win"
                    );
                }
            }
        }

        let snapshot = self.game.snapshot();
        if let Err(e) = self.store.save(&snapshot).await {
            tracing::warn!(
                room_id = %self.game.room_id(),
                error = %e,
                "snapshot save failed after move"
            );
            return Err(e.into());
        }
        Ok(outcome.explosions)
    }

    /// Drains events the game emitted during the last command and
    /// fans them out to every live sink.
    fn flush_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            let notice = match event {
                GameEvent::StatusChange(snapshot) => {
                    RoomNotice::Status(snapshot)
                }
                GameEvent::ChainReaction(trace) => RoomNotice::Chain(trace),
            };
            self.watchers
                .retain(|sink| sink.send(notice.clone()).is_ok());
        }
    }
}

/// Spawns a room actor task owning `game` and returns a handle to it.
///
/// The actor subscribes to the game's event bus before taking
/// ownership, so every status-change and chain-reaction event flows
/// into its fan-out queue.
pub(crate) fn spawn_room<S: GameStore>(
    mut game: Game,
    store: Arc<S>,
    channel_size: usize,
) -> RoomHandle {
    let room_id = game.room_id().clone();
    let (cmd_tx, cmd_rx) = mpsc::channel(channel_size);
    let (event_tx, event_rx) = mpsc::unbounded_channel();

    for kind in [EventKind::StatusChange, EventKind::ChainReaction] {
        let tx = event_tx.clone();
        game.subscribe(
            kind,
            Box::new(move |event| {
                let _ = tx.send(event.clone());
            }),
        );
    }

    let actor = RoomActor {
        game,
        store,
        watchers: Vec::new(),
        events: event_rx,
        receiver: cmd_rx,
        win_recorded: false,
    };

    tokio::spawn(actor.run());

    RoomHandle {
        room_id,
        sender: cmd_tx,
    }
}
