//! The board: a fixed R×C grid of cells, each holding an owner and an
//! atom count.
//!
//! The board is pure data plus invariant checks. It knows nothing
//! about turns, players beyond their roster index, or win conditions —
//! those live in [`crate::Game`]. The cascade simulator drives it
//! through [`Board::place_atom`] and [`Board::neighbors`].

use serde::{Deserialize, Serialize};

/// Default board height, matching the classic 6×9 layout.
pub const DEFAULT_ROWS: usize = 6;
/// Default board width.
pub const DEFAULT_COLS: usize = 9;

/// One cell of the board.
///
/// Invariant: `atoms == 0` implies `owner == None`. An owned cell
/// always holds at least one atom; an empty cell is neutral.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Roster index of the owning player, if any.
    pub owner: Option<u8>,
    /// Number of atoms currently in the cell.
    pub atoms: u8,
}

impl Cell {
    /// Returns `true` if the cell holds no atoms.
    pub fn is_empty(&self) -> bool {
        self.atoms == 0
    }
}

/// A fixed-size grid of [`Cell`]s, stored row-major in a flat arena.
///
/// Positions are `(row, col)` with `row < rows` and `col < cols`.
/// Out-of-range access is a programming error and panics; user-facing
/// bounds checks belong to the game layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Creates an empty board. Requires at least 3×3 so that the
    /// corner/edge/interior distinction is meaningful.
    pub fn new(rows: usize, cols: usize) -> Self {
        assert!(rows >= 3 && cols >= 3, "board must be at least 3x3");
        Self {
            rows,
            cols,
            cells: vec![Cell::default(); rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    fn idx(&self, row: usize, col: usize) -> usize {
        assert!(self.in_bounds(row, col), "({row},{col}) out of bounds");
        row * self.cols + col
    }

    /// Returns `true` if `(row, col)` lies on the board.
    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    /// Returns the cell at `(row, col)`.
    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.cells[self.idx(row, col)]
    }

    /// The atom count at which the cell at `(row, col)` explodes:
    /// 2 in a corner, 3 on a non-corner edge, 4 in the interior.
    ///
    /// Determined purely by geometry — never stored, never mutated.
    pub fn critical_mass(&self, row: usize, col: usize) -> u8 {
        assert!(self.in_bounds(row, col), "({row},{col}) out of bounds");
        let on_row_edge = row == 0 || row == self.rows - 1;
        let on_col_edge = col == 0 || col == self.cols - 1;
        match (on_row_edge, on_col_edge) {
            (true, true) => 2,
            (true, false) | (false, true) => 3,
            (false, false) => 4,
        }
    }

    /// Adds one atom at `(row, col)` and hands the cell to `owner`,
    /// regardless of who held it before. Returns the new atom count.
    ///
    /// Capturing on placement is deliberate: it is the only way a
    /// trailing player can retake territory.
    pub fn place_atom(&mut self, row: usize, col: usize, owner: u8) -> u8 {
        let idx = self.idx(row, col);
        let cell = &mut self.cells[idx];
        cell.atoms += 1;
        cell.owner = Some(owner);
        cell.atoms
    }

    /// Resets the cell at `(row, col)` to empty and unowned.
    pub(crate) fn clear_cell(&mut self, row: usize, col: usize) {
        let idx = self.idx(row, col);
        self.cells[idx] = Cell::default();
    }

    /// The up-to-4 in-bounds orthogonal neighbors of `(row, col)`.
    pub fn neighbors(
        &self,
        row: usize,
        col: usize,
    ) -> impl Iterator<Item = (usize, usize)> + '_ {
        const ORTHOGONAL: [(isize, isize); 4] =
            [(-1, 0), (1, 0), (0, -1), (0, 1)];
        ORTHOGONAL.into_iter().filter_map(move |(dr, dc)| {
            let r = row.checked_add_signed(dr)?;
            let c = col.checked_add_signed(dc)?;
            self.in_bounds(r, c).then_some((r, c))
        })
    }

    /// Counts the cells owned by each of the first `player_count`
    /// roster indices. Used for elimination detection.
    pub fn owned_counts(&self, player_count: usize) -> Vec<u32> {
        let mut counts = vec![0u32; player_count];
        for cell in &self.cells {
            if let Some(owner) = cell.owner {
                if let Some(count) = counts.get_mut(owner as usize) {
                    *count += 1;
                }
            }
        }
        counts
    }

    /// Returns `true` if every occupied cell belongs to `player`.
    pub fn fully_owned_by(&self, player: u8) -> bool {
        self.cells
            .iter()
            .all(|c| c.is_empty() || c.owner == Some(player))
    }

    /// Sum of all atoms on the board. Conservation check for tests
    /// and debugging.
    pub fn total_atoms(&self) -> u32 {
        self.cells.iter().map(|c| c.atoms as u32).sum()
    }

    /// Iterates over all cells with their positions.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, c)| (i / self.cols, i % self.cols, *c))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(DEFAULT_ROWS, DEFAULT_COLS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_critical_mass_by_position_6x9() {
        let b = Board::default();
        // Four corners
        for (r, c) in [(0, 0), (0, 8), (5, 0), (5, 8)] {
            assert_eq!(b.critical_mass(r, c), 2, "corner ({r},{c})");
        }
        // Non-corner edges
        assert_eq!(b.critical_mass(0, 4), 3);
        assert_eq!(b.critical_mass(5, 4), 3);
        assert_eq!(b.critical_mass(3, 0), 3);
        assert_eq!(b.critical_mass(3, 8), 3);
        // Interior
        assert_eq!(b.critical_mass(1, 1), 4);
        assert_eq!(b.critical_mass(3, 4), 4);
    }

    #[test]
    fn test_critical_mass_minimum_board() {
        // On 3×3 the single interior cell is (1,1).
        let b = Board::new(3, 3);
        assert_eq!(b.critical_mass(0, 0), 2);
        assert_eq!(b.critical_mass(0, 1), 3);
        assert_eq!(b.critical_mass(1, 0), 3);
        assert_eq!(b.critical_mass(1, 1), 4);
        assert_eq!(b.critical_mass(2, 2), 2);
    }

    #[test]
    #[should_panic(expected = "at least 3x3")]
    fn test_board_rejects_tiny_dimensions() {
        let _ = Board::new(2, 9);
    }

    #[test]
    fn test_place_atom_captures_cell() {
        let mut b = Board::default();
        assert_eq!(b.place_atom(2, 3, 0), 1);
        assert_eq!(b.cell(2, 3).owner, Some(0));

        // A different player placing here takes the cell over.
        assert_eq!(b.place_atom(2, 3, 1), 2);
        assert_eq!(b.cell(2, 3).owner, Some(1));
        assert_eq!(b.cell(2, 3).atoms, 2);
    }

    #[test]
    fn test_neighbors_corner_edge_interior() {
        let b = Board::default();
        let corner: Vec<_> = b.neighbors(0, 0).collect();
        assert_eq!(corner, vec![(1, 0), (0, 1)]);

        let edge: Vec<_> = b.neighbors(0, 4).collect();
        assert_eq!(edge.len(), 3);

        let interior: Vec<_> = b.neighbors(3, 4).collect();
        assert_eq!(interior.len(), 4);
        assert_eq!(interior, vec![(2, 4), (4, 4), (3, 3), (3, 5)]);
    }

    #[test]
    fn test_empty_cell_invariant() {
        let mut b = Board::default();
        b.place_atom(1, 1, 0);
        b.clear_cell(1, 1);
        let cell = b.cell(1, 1);
        assert!(cell.is_empty());
        assert_eq!(cell.owner, None);
    }

    #[test]
    fn test_owned_counts() {
        let mut b = Board::default();
        b.place_atom(0, 0, 0);
        b.place_atom(0, 1, 0);
        b.place_atom(5, 8, 1);
        assert_eq!(b.owned_counts(2), vec![2, 1]);
    }

    #[test]
    fn test_fully_owned_by() {
        let mut b = Board::new(3, 3);
        assert!(b.fully_owned_by(0), "empty board has no dissenters");
        b.place_atom(0, 0, 0);
        assert!(b.fully_owned_by(0));
        b.place_atom(2, 2, 1);
        assert!(!b.fully_owned_by(0));
    }

    #[test]
    fn test_total_atoms() {
        let mut b = Board::default();
        assert_eq!(b.total_atoms(), 0);
        b.place_atom(0, 0, 0);
        b.place_atom(0, 0, 0);
        b.place_atom(3, 3, 1);
        assert_eq!(b.total_atoms(), 3);
    }
}
