//! Checkers Core - Rule engine
//!
//! This crate provides the rules of two-player checkers:
//! - Board geometry (8x8 grid, dark-square play)
//! - Pieces, sides and promotion
//! - Move validation for men and kings
//! - Move execution with captures
//! - Game state: turn order, win/draw detection, score keeping
//!
//! Rendering, audio and pointer mapping live outside the crate; they feed
//! `InputEvent`s in and react to `GameEvent`s and `Notification`s.

pub mod board;
pub mod config;
pub mod error;
pub mod events;
pub mod executor;
pub mod game;
pub mod pieces;
pub mod validator;

// Re-exports for convenient access
pub use board::{Board, Square, BOARD_COLS, BOARD_ROWS};
pub use config::{GameConfig, KingPass, RuleSet, Stalemate, Timing};
pub use error::Rejection;
pub use events::{GameEvent, GameOutcome, InputEvent, Notification, NotificationKind};
pub use executor::{Applied, MoveExecutor};
pub use game::{GameState, MoveOutcome, MoveReport};
pub use pieces::{Piece, PieceId, PieceSet, Side};
pub use validator::{MoveKind, MoveValidator};
