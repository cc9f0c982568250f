//! Board geometry and the 8x8 occupancy grid

use serde::{Deserialize, Serialize};

use crate::pieces::PieceId;

/// Number of columns on the board
pub const BOARD_COLS: i8 = 8;

/// Number of rows on the board
pub const BOARD_ROWS: i8 = 8;

/// Rows each side fills at setup
pub const SETUP_ROWS: i8 = 3;

/// Board coordinates (column, row), zero-indexed
///
/// Squares built from raw input may lie off the board; check `is_valid`
/// before indexing anything with them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Square {
    pub col: i8,
    pub row: i8,
}

impl Square {
    pub const fn new(col: i8, row: i8) -> Self {
        Self { col, row }
    }

    /// Check if this square is on the board
    pub fn is_valid(&self) -> bool {
        (0..BOARD_COLS).contains(&self.col) && (0..BOARD_ROWS).contains(&self.row)
    }

    /// Playable (dark) squares have an odd coordinate sum
    pub fn is_dark(&self) -> bool {
        (self.col + self.row).rem_euclid(2) == 1
    }

    /// Square shifted by (dc, dr)
    pub fn offset(&self, dc: i8, dr: i8) -> Square {
        Square::new(self.col + dc, self.row + dr)
    }

    /// Every square on the board, row by row
    pub fn all() -> impl Iterator<Item = Square> {
        (0..BOARD_ROWS).flat_map(|row| (0..BOARD_COLS).map(move |col| Square::new(col, row)))
    }

    fn index(&self) -> Option<usize> {
        if self.is_valid() {
            Some(self.row as usize * BOARD_COLS as usize + self.col as usize)
        } else {
            None
        }
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.col, self.row)
    }
}

/// Occupancy grid. Each cell references at most one piece.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    cells: [Option<PieceId>; (BOARD_COLS * BOARD_ROWS) as usize],
}

impl Board {
    /// Create an empty board
    pub fn new() -> Self {
        Self {
            cells: [None; (BOARD_COLS * BOARD_ROWS) as usize],
        }
    }

    /// Piece referenced by a cell, `None` for empty or off-board squares
    pub fn cell_at(&self, square: Square) -> Option<PieceId> {
        square.index().and_then(|i| self.cells[i])
    }

    /// True only for on-board squares holding no piece
    pub fn is_empty(&self, square: Square) -> bool {
        match square.index() {
            Some(i) => self.cells[i].is_none(),
            None => false,
        }
    }

    /// Put a piece reference on a square. Off-board squares are ignored.
    pub fn place(&mut self, id: PieceId, square: Square) {
        if let Some(i) = square.index() {
            self.cells[i] = Some(id);
        }
    }

    /// Empty a square, returning whatever was there
    pub fn clear(&mut self, square: Square) -> Option<PieceId> {
        square.index().and_then(|i| self.cells[i].take())
    }

    /// Empty every square
    pub fn clear_all(&mut self) {
        self.cells = [None; (BOARD_COLS * BOARD_ROWS) as usize];
    }

    /// Occupied squares in row-major order
    pub fn occupied(&self) -> impl Iterator<Item = (Square, PieceId)> + '_ {
        Square::all().filter_map(move |sq| self.cell_at(sq).map(|id| (sq, id)))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
