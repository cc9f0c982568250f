//! Game state: turn flow, terminal detection and score keeping

use std::time::{Duration, Instant};

use crate::board::{Board, Square, BOARD_COLS, BOARD_ROWS, SETUP_ROWS};
use crate::config::{GameConfig, Stalemate};
use crate::error::Rejection;
use crate::events::{GameEvent, GameOutcome, InputEvent, Notification, NotificationKind};
use crate::executor::MoveExecutor;
use crate::pieces::{Piece, PieceId, PieceSet, Side};
use crate::validator::{MoveKind, MoveValidator};

// ============================================================================
// RESULT TYPES
// ============================================================================

/// An accepted move
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveReport {
    pub from: Square,
    pub to: Square,
    pub captured: Option<Piece>,
    pub promoted: bool,
    /// Set when this move ended the game
    pub ended: Option<GameOutcome>,
}

/// Result of a move attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Accepted(MoveReport),
    Rejected(Rejection),
}

impl MoveOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, MoveOutcome::Accepted(_))
    }

    pub fn report(&self) -> Option<&MoveReport> {
        match self {
            MoveOutcome::Accepted(report) => Some(report),
            MoveOutcome::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<Rejection> {
        match *self {
            MoveOutcome::Accepted(_) => None,
            MoveOutcome::Rejected(reason) => Some(reason),
        }
    }
}

// ============================================================================
// GAME STATE
// ============================================================================

/// One checkers session: the current game plus the running score
#[derive(Clone, Debug)]
pub struct GameState {
    board: Board,
    pieces: PieceSet,

    current_player: Side,
    selected: Option<PieceId>,

    /// Set once a terminal condition is detected
    outcome: Option<GameOutcome>,
    ended_at: Option<Instant>,

    white_wins: u32,
    black_wins: u32,

    events: Vec<GameEvent>,
    notifications: Vec<Notification>,

    config: GameConfig,
    validator: MoveValidator,
    executor: MoveExecutor,
}

impl GameState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// New session with the standard starting layout
    pub fn new(config: GameConfig) -> Self {
        let mut state = Self::empty(config, Side::White);
        state.init_pieces();
        state
    }

    /// New session from an arbitrary position of (side, square, is_king)
    /// entries. Off-board or doubly occupied squares are skipped.
    pub fn from_setup(setup: &[(Side, Square, bool)], to_move: Side, config: GameConfig) -> Self {
        let mut state = Self::empty(config, to_move);
        for &(side, square, is_king) in setup {
            if !state.board.is_empty(square) {
                tracing::warn!("Skipping setup entry for {} at {}: square unavailable", side, square);
                continue;
            }
            state.add_piece(side, square, is_king);
        }
        state.check_terminal();
        state
    }

    fn empty(config: GameConfig, to_move: Side) -> Self {
        Self {
            board: Board::new(),
            pieces: PieceSet::new(),
            current_player: to_move,
            selected: None,
            outcome: None,
            ended_at: None,
            white_wins: 0,
            black_wins: 0,
            events: Vec::new(),
            notifications: Vec::new(),
            config,
            validator: MoveValidator::new(config.rules),
            executor: MoveExecutor,
        }
    }

    /// Standard layout: three rows per side on the dark squares
    fn init_pieces(&mut self) {
        self.board.clear_all();
        self.pieces.clear();

        for row in 0..SETUP_ROWS {
            for col in 0..BOARD_COLS {
                let square = Square::new(col, row);
                if square.is_dark() {
                    self.add_piece(Side::White, square, false);
                }
            }
        }

        for row in BOARD_ROWS - SETUP_ROWS..BOARD_ROWS {
            for col in 0..BOARD_COLS {
                let square = Square::new(col, row);
                if square.is_dark() {
                    self.add_piece(Side::Black, square, false);
                }
            }
        }
    }

    fn add_piece(&mut self, side: Side, square: Square, is_king: bool) {
        let id = PieceId(self.pieces.len() as u8);
        let mut piece = Piece::new(id, side, square);
        piece.is_king = is_king;
        self.board.place(id, square);
        self.pieces.insert(piece);
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn pieces(&self) -> &PieceSet {
        &self.pieces
    }

    /// Piece standing on a square
    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.board.cell_at(square).and_then(|id| self.pieces.get(id))
    }

    pub fn current_player(&self) -> Side {
        self.current_player
    }

    pub fn selected(&self) -> Option<&Piece> {
        self.selected.and_then(|id| self.pieces.get(id))
    }

    pub fn is_game_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn white_wins(&self) -> u32 {
        self.white_wins
    }

    pub fn black_wins(&self) -> u32 {
        self.black_wins
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn validator(&self) -> &MoveValidator {
        &self.validator
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Take the events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// Legal (from, to) pairs for the side to move
    pub fn legal_moves(&self) -> Vec<(Square, Square)> {
        if self.is_game_over() {
            return vec![];
        }

        self.pieces
            .of_side(self.current_player)
            .flat_map(|piece| {
                self.validator
                    .legal_destinations(piece, &self.board, &self.pieces)
                    .into_iter()
                    .map(move |dest| (piece.square, dest))
            })
            .collect()
    }

    /// Legal destinations for the piece on `square`
    pub fn legal_destinations(&self, square: Square) -> Vec<Square> {
        match self.piece_at(square) {
            Some(piece) => self.validator.legal_destinations(piece, &self.board, &self.pieces),
            None => vec![],
        }
    }

    // ========================================================================
    // INPUT
    // ========================================================================

    /// Dispatch an input adapter event. Only move attempts produce an outcome.
    pub fn handle(&mut self, event: InputEvent) -> Option<MoveOutcome> {
        match event {
            InputEvent::SelectCell(square) => {
                let _ = self.select_cell(square);
                None
            }
            InputEvent::AttemptMove(square) => Some(self.attempt_move(square)),
        }
    }

    /// Pointer semantics: the first click selects, the second attempts a move
    pub fn click(&mut self, square: Square) -> Option<MoveOutcome> {
        if self.selected.is_none() {
            self.handle(InputEvent::SelectCell(square))
        } else {
            self.handle(InputEvent::AttemptMove(square))
        }
    }

    /// Select one of the current player's pieces. A failed selection clears
    /// the previous one and is otherwise silent.
    pub fn select_cell(&mut self, square: Square) -> Result<PieceId, Rejection> {
        self.selected = None;

        if self.is_game_over() {
            return Err(Rejection::GameOver);
        }
        if !square.is_valid() {
            return Err(Rejection::OffBoard);
        }

        let piece = self.piece_at(square).ok_or(Rejection::EmptyCell)?;
        if piece.side != self.current_player {
            return Err(Rejection::NotYourPiece);
        }

        let id = piece.id;
        self.selected = Some(id);
        Ok(id)
    }

    /// Move the selected piece to `dest`. The selection is consumed either way.
    pub fn attempt_move(&mut self, dest: Square) -> MoveOutcome {
        if self.is_game_over() {
            self.selected = None;
            return MoveOutcome::Rejected(Rejection::GameOver);
        }

        let piece = match self.selected.take().and_then(|id| self.pieces.get(id)) {
            Some(piece) => *piece,
            None => return MoveOutcome::Rejected(Rejection::NoSelection),
        };

        match self.validator.check(&piece, dest, &self.board, &self.pieces) {
            Ok(kind) => self.accept(piece.id, dest, kind),
            Err(reason) => self.reject(piece.square, dest, reason),
        }
    }

    /// Select then attempt in one step
    pub fn try_move(&mut self, from: Square, to: Square) -> MoveOutcome {
        match self.select_cell(from) {
            Ok(_) => self.attempt_move(to),
            Err(Rejection::GameOver) => MoveOutcome::Rejected(Rejection::GameOver),
            Err(reason) => self.reject(from, to, reason),
        }
    }

    fn accept(&mut self, id: PieceId, dest: Square, kind: MoveKind) -> MoveOutcome {
        let applied = match self
            .executor
            .apply(id, dest, kind, &mut self.board, &mut self.pieces)
        {
            Some(applied) => applied,
            None => return MoveOutcome::Rejected(Rejection::NoSelection),
        };

        tracing::debug!(
            "{} moved {} -> {}{}{}",
            self.current_player,
            applied.from,
            applied.to,
            if applied.is_capture() { " (capture)" } else { "" },
            if applied.promoted { " (crowned)" } else { "" }
        );
        self.events.push(GameEvent::MoveCompleted {
            captured: applied.is_capture(),
        });

        let ended = self.evaluate_terminal(self.current_player.opponent());
        if ended.is_none() {
            self.current_player = self.current_player.opponent();
        }

        MoveOutcome::Accepted(MoveReport {
            from: applied.from,
            to: applied.to,
            captured: applied.captured,
            promoted: applied.promoted,
            ended,
        })
    }

    fn reject(&mut self, from: Square, to: Square, reason: Rejection) -> MoveOutcome {
        tracing::debug!("{} move {} -> {} rejected: {}", self.current_player, from, to, reason);
        self.events.push(GameEvent::MoveRejected);
        let duration = self.config.timing.wrong_move();
        self.notify("Wrong Move", NotificationKind::Error, duration);
        MoveOutcome::Rejected(reason)
    }

    // ========================================================================
    // TERMINAL CONDITIONS
    // ========================================================================

    /// Evaluate terminal conditions for the side to move
    pub fn check_terminal(&mut self) -> Option<GameOutcome> {
        if self.outcome.is_some() {
            return self.outcome;
        }
        self.evaluate_terminal(self.current_player)
    }

    fn evaluate_terminal(&mut self, to_move: Side) -> Option<GameOutcome> {
        let outcome = if self.pieces.count(Side::White) == 0 {
            GameOutcome::Winner(Side::Black)
        } else if self.pieces.count(Side::Black) == 0 {
            GameOutcome::Winner(Side::White)
        } else if !self.validator.has_any_move(to_move, &self.board, &self.pieces) {
            match self.config.rules.stalemate {
                Stalemate::Draw => GameOutcome::Draw,
                Stalemate::Loss => GameOutcome::Winner(to_move.opponent()),
            }
        } else {
            return None;
        };

        self.finish(outcome);
        Some(outcome)
    }

    fn finish(&mut self, outcome: GameOutcome) {
        self.outcome = Some(outcome);
        self.ended_at = Some(Instant::now());
        self.selected = None;

        let duration = self.config.timing.game_over();
        match outcome {
            GameOutcome::Winner(Side::White) => {
                self.white_wins += 1;
                self.notify("WHITE WON!", NotificationKind::Success, duration);
            }
            GameOutcome::Winner(Side::Black) => {
                self.black_wins += 1;
                self.notify("BLACK WON!", NotificationKind::Success, duration);
            }
            GameOutcome::Draw => {
                self.notify("DRAW!", NotificationKind::Info, duration);
            }
        }

        tracing::info!(
            "Game over: {:?} (score: White {} - Black {})",
            outcome,
            self.white_wins,
            self.black_wins
        );
        self.events.push(GameEvent::GameEnded {
            winner: outcome.winner(),
        });
    }

    // ========================================================================
    // LIFECYCLE
    // ========================================================================

    /// Start a new game with the standard layout. Scores carry over.
    pub fn reset(&mut self) {
        self.init_pieces();
        self.current_player = Side::White;
        self.selected = None;
        self.outcome = None;
        self.ended_at = None;
        self.events.clear();
        tracing::info!("New game started");
    }

    /// Driver hook: expire notifications and reset once the postgame pause
    /// has elapsed. Returns true if a reset happened.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.expire_notifications(now);

        match self.ended_at {
            Some(ended_at) if now >= ended_at + self.config.timing.postgame_pause() => {
                self.reset();
                true
            }
            _ => false,
        }
    }

    /// Drop notifications whose time is up
    pub fn expire_notifications(&mut self, now: Instant) {
        self.notifications.retain(|note| !note.is_expired(now));
    }

    fn notify(&mut self, text: &str, kind: NotificationKind, duration: Duration) {
        self.notifications.push(Notification {
            text: text.to_string(),
            kind,
            expires_at: Instant::now() + duration,
        });
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

// ============================================================================
// TESTS
// ============================================================================
