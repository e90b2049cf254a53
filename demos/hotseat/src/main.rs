//! Hot-seat demo: two scripted games played through the full stack
//! (manager, room actors, in-memory store, notice stream), with the
//! board printed after every accepted move.
//!
//! Run with `RUST_LOG=debug` to watch the room layer's own logging.

use std::sync::Arc;

use fission_core::{GameSnapshot, GameStatus, PlayerId};
use fission_room::{RoomHandle, RoomManager, RoomNotice};
use fission_store::MemoryStore;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Renders the board as one line per row: `.` for empty, otherwise
/// the owner's letter and the atom count (`a2`, `b1`, ...).
fn render(snapshot: &GameSnapshot) -> String {
    let mut out = String::new();
    for row in 0..snapshot.board.rows() {
        for col in 0..snapshot.board.cols() {
            let cell = snapshot.board.cell(row, col);
            match cell.owner {
                Some(owner) => {
                    out.push((b'a' + owner) as char);
                    out.push((b'0' + cell.atoms) as char);
                }
                None => out.push_str(" ."),
            }
            out.push(' ');
        }
        out.push('\n');
    }
    out
}

/// Forwards a room's notices to stdout until the room goes away.
fn print_notices(label: &'static str, mut rx: mpsc::UnboundedReceiver<RoomNotice>) {
    tokio::spawn(async move {
        while let Some(notice) = rx.recv().await {
            match notice {
                RoomNotice::Status(snapshot) => {
                    println!(
                        "[{label}] status={} turn={}",
                        snapshot.status, snapshot.current_turn
                    );
                }
                RoomNotice::Chain(trace) => {
                    let cells: Vec<String> = trace
                        .iter()
                        .map(|e| format!("({},{})", e.row, e.col))
                        .collect();
                    println!("[{label}] chain reaction: {}", cells.join(" -> "));
                }
            }
        }
    });
}

async fn play_and_show(
    room: &RoomHandle,
    player: &PlayerId,
    row: usize,
    col: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let trace = room.play(player.clone(), row, col).await?;
    let snapshot = room.snapshot().await?;
    println!(
        "{player} -> ({row},{col}), {} explosion(s):\n{}",
        trace.len(),
        render(&snapshot)
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let store = Arc::new(MemoryStore::new());
    let mut manager = RoomManager::new(Arc::clone(&store));

    let alice = PlayerId::new("alice");
    let bob = PlayerId::new("bob");

    // ---- Game one: corner skirmish, watch the chains fly -------------

    let room_id = manager.create_room(alice.clone(), "Alice").await?;
    info!(%room_id, "demo room created");
    let room = manager.room(&room_id)?;
    room.join(bob.clone(), "Bob").await?;

    let (tx, rx) = mpsc::unbounded_channel();
    room.watch(tx).await?;
    print_notices("skirmish", rx);

    play_and_show(&room, &alice, 0, 0).await?;
    play_and_show(&room, &bob, 5, 8).await?;
    play_and_show(&room, &alice, 0, 0).await?; // corner pops
    play_and_show(&room, &bob, 5, 8).await?; // so does the other one
    play_and_show(&room, &alice, 0, 1).await?;
    play_and_show(&room, &bob, 5, 7).await?;

    // ---- Game two: a quick elimination ------------------------------

    let carol = PlayerId::new("carol");
    let dave = PlayerId::new("dave");

    let room_id = manager.create_room(carol.clone(), "Carol").await?;
    let room = manager.room(&room_id)?;
    room.join(dave.clone(), "Dave").await?;

    play_and_show(&room, &carol, 0, 0).await?;
    play_and_show(&room, &dave, 0, 1).await?;
    play_and_show(&room, &carol, 0, 0).await?; // captures Dave's only cell

    let snapshot = room.snapshot().await?;
    assert_eq!(snapshot.status, GameStatus::Finished);
    if let Some(winner) = snapshot.winner_id() {
        println!("game over, {winner} wins");
    }

    // The store saw every accepted mutation plus the recorded win.
    println!(
        "store: {} game(s), carol has {} win(s)",
        store.game_count(),
        store.wins(&carol)
    );

    for room_id in manager.room_ids() {
        manager.destroy_room(&room_id).await?;
    }
    Ok(())
}
