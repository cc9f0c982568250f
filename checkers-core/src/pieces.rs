//! Sides, pieces and the live-piece collection

use serde::{Deserialize, Serialize};

use crate::board::{Square, BOARD_ROWS};

/// Player color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    White = 0,
    Black = 1,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// Row direction a man may move in
    pub fn forward(self) -> i8 {
        match self {
            Side::White => 1,
            Side::Black => -1,
        }
    }

    /// Row on which a man of this side is crowned
    pub fn promotion_row(self) -> i8 {
        match self {
            Side::White => BOARD_ROWS - 1,
            Side::Black => 0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Side::White => "White",
            Side::Black => "Black",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Identity of a piece within one game
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId(pub u8);

/// A piece in play
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub id: PieceId,
    pub side: Side,
    pub square: Square,
    pub is_king: bool,
}

impl Piece {
    pub fn new(id: PieceId, side: Side, square: Square) -> Self {
        Self {
            id,
            side,
            square,
            is_king: false,
        }
    }
}

/// Live pieces, kept in id order
///
/// Membership mirrors the board: a piece is in the set iff some board cell
/// references its id.
#[derive(Clone, Debug, Default)]
pub struct PieceSet {
    pieces: Vec<Piece>,
}

impl PieceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Add a piece. Ids are expected to be assigned in increasing order.
    pub fn insert(&mut self, piece: Piece) {
        match self.pieces.binary_search_by_key(&piece.id, |p| p.id) {
            Ok(i) => self.pieces[i] = piece,
            Err(i) => self.pieces.insert(i, piece),
        }
    }

    pub fn get(&self, id: PieceId) -> Option<&Piece> {
        self.position(id).map(|i| &self.pieces[i])
    }

    pub fn get_mut(&mut self, id: PieceId) -> Option<&mut Piece> {
        self.position(id).map(move |i| &mut self.pieces[i])
    }

    /// Drop a piece from play, returning its final state
    pub fn remove(&mut self, id: PieceId) -> Option<Piece> {
        self.position(id).map(|i| self.pieces.remove(i))
    }

    pub fn clear(&mut self) {
        self.pieces.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.pieces.iter()
    }

    /// Pieces belonging to one side
    pub fn of_side(&self, side: Side) -> impl Iterator<Item = &Piece> + '_ {
        self.pieces.iter().filter(move |p| p.side == side)
    }

    pub fn count(&self, side: Side) -> usize {
        self.of_side(side).count()
    }

    fn position(&self, id: PieceId) -> Option<usize> {
        self.pieces.binary_search_by_key(&id, |p| p.id).ok()
    }
}
