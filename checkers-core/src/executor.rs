//! Applying validated moves: relocation, capture, promotion

use serde::{Deserialize, Serialize};

use crate::board::{Board, Square};
use crate::pieces::{Piece, PieceId, PieceSet};
use crate::validator::MoveKind;

/// What a move did, for collaborators that react to it (sound, visuals)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applied {
    pub from: Square,
    pub to: Square,
    /// Final state of the removed enemy piece
    pub captured: Option<Piece>,
    pub promoted: bool,
}

impl Applied {
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

/// Applies moves the validator has already accepted
#[derive(Clone, Copy, Debug, Default)]
pub struct MoveExecutor;

impl MoveExecutor {
    /// Move `id` to `dest`, removing the captured piece named by `kind`.
    ///
    /// Returns `None` only if `id` is not in play, in which case nothing
    /// changes.
    pub fn apply(
        &self,
        id: PieceId,
        dest: Square,
        kind: MoveKind,
        board: &mut Board,
        pieces: &mut PieceSet,
    ) -> Option<Applied> {
        let from = pieces.get(id)?.square;

        let captured = kind
            .captured_square()
            .and_then(|over| board.clear(over))
            .and_then(|victim| pieces.remove(victim));

        board.clear(from);
        let piece = pieces.get_mut(id)?;
        piece.square = dest;
        board.place(id, dest);

        let promoted = !piece.is_king && dest.row == piece.side.promotion_row();
        if promoted {
            piece.is_king = true;
        }

        Some(Applied {
            from,
            to: dest,
            captured,
            promoted,
        })
    }
}
