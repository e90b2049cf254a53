//! The chain-reaction simulator: resolves cascading explosions after a
//! placed atom until the board is stable.
//!
//! A cell explodes when its atom count reaches its critical mass. The
//! explosion empties the cell and pushes one atom into each in-bounds
//! orthogonal neighbor, capturing it for the triggering player — which
//! can tip those neighbors over their own critical mass in turn.
//!
//! The natural formulation is recursive, but recursion depth would be
//! bounded only by board size and cascade length. We use an explicit
//! FIFO work-list instead: pending positions are queued, popped, and
//! re-checked against their critical mass, so stack usage stays
//! constant no matter how long the cascade runs.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::Board;

/// One exploded cell in a cascade, in resolution order.
///
/// The trace is what clients animate, so ordering is part of the
/// contract: re-running the same move on the same board yields the
/// same trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explosion {
    pub row: usize,
    pub col: usize,
    /// Roster index of the player whose move triggered the cascade.
    pub player: u8,
}

/// Resolves all explosions starting from `(row, col)` after `player`
/// placed an atom there. Mutates the board in place and returns the
/// ordered explosion trace (empty if the cell was below critical mass).
///
/// Each popped position is re-checked, so positions queued more than
/// once are handled correctly. The loop stops early once every
/// occupied cell belongs to `player`: from that point further
/// explosions cannot change ownership, and on a saturated board they
/// would otherwise cycle forever.
pub fn resolve(
    board: &mut Board,
    row: usize,
    col: usize,
    player: u8,
) -> Vec<Explosion> {
    let mut trace = Vec::new();
    let mut pending = VecDeque::new();
    pending.push_back((row, col));

    while let Some((r, c)) = pending.pop_front() {
        if board.cell(r, c).atoms < board.critical_mass(r, c) {
            continue;
        }

        trace.push(Explosion { row: r, col: c, player });
        board.clear_cell(r, c);

        let neighbors: Vec<_> = board.neighbors(r, c).collect();
        for (nr, nc) in neighbors {
            board.place_atom(nr, nc, player);
            pending.push_back((nr, nc));
        }

        if board.fully_owned_by(player) {
            break;
        }
    }

    trace
}
