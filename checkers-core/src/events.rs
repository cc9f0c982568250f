//! Inputs the engine accepts and outputs it emits for the presentation layer

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::board::Square;
use crate::pieces::Side;

/// Cell events from an input adapter
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    SelectCell(Square),
    AttemptMove(Square),
}

/// How a game ended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    Winner(Side),
    Draw,
}

impl GameOutcome {
    pub fn winner(&self) -> Option<Side> {
        match *self {
            GameOutcome::Winner(side) => Some(side),
            GameOutcome::Draw => None,
        }
    }
}

/// Cues for sound and visuals
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    MoveCompleted { captured: bool },
    MoveRejected,
    /// `winner` is `None` for a draw
    GameEnded { winner: Option<Side> },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

/// Transient message shown until `expires_at`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub text: String,
    pub kind: NotificationKind,
    pub expires_at: Instant,
}

impl Notification {
    pub fn is_expired(&self, now: Instant) -> bool {
        self.expires_at <= now
    }
}
