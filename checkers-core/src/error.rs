//! Rejection reasons for selections and move attempts
//!
//! None of these are fatal: the state is unchanged and the player simply
//! tries again.

use serde::{Deserialize, Serialize};

/// Why a selection or move attempt was refused
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum Rejection {
    #[error("the game is over")]
    GameOver,

    #[error("no piece selected")]
    NoSelection,

    #[error("square is off the board")]
    OffBoard,

    #[error("square is empty")]
    EmptyCell,

    #[error("piece belongs to the opponent")]
    NotYourPiece,

    #[error("destination is occupied")]
    Occupied,

    #[error("move is not diagonal")]
    NotDiagonal,

    #[error("men may only move forward")]
    WrongDirection,

    #[error("men move one square or jump two")]
    TooFar,

    #[error("no enemy piece to jump")]
    NothingToCapture,

    #[error("path is blocked")]
    Blocked,
}
