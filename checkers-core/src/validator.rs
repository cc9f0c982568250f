//! Move legality
//!
//! Men step one square diagonally forward or jump two squares forward over
//! an enemy piece. Kings move any distance along a diagonal, passing no
//! friendly piece and at most one enemy piece.

use serde::{Deserialize, Serialize};

use crate::board::{Board, Square};
use crate::config::{KingPass, RuleSet};
use crate::error::Rejection;
use crate::pieces::{Piece, PieceSet, Side};

/// Shape of a legal move, as the executor needs to know it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveKind {
    /// Man moves one square
    Step,
    /// Man jumps over the enemy on `over`
    Jump { over: Square },
    /// King moves along a diagonal, capturing the enemy on `over` if any
    KingSlide { over: Option<Square> },
}

impl MoveKind {
    /// Square of the piece this move removes
    pub fn captured_square(&self) -> Option<Square> {
        match *self {
            MoveKind::Step => None,
            MoveKind::Jump { over } => Some(over),
            MoveKind::KingSlide { over } => over,
        }
    }
}

/// What lies strictly between a king and its destination
struct PathScan {
    friendly: bool,
    enemies: Vec<Square>,
}

/// Stateless legality checks for one rule set
#[derive(Clone, Copy, Debug, Default)]
pub struct MoveValidator {
    rules: RuleSet,
}

impl MoveValidator {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> RuleSet {
        self.rules
    }

    /// Whether `piece` may move to `dest`
    pub fn is_legal(&self, piece: &Piece, dest: Square, board: &Board, pieces: &PieceSet) -> bool {
        self.check(piece, dest, board, pieces).is_ok()
    }

    /// Classify a move, or say why it is illegal
    pub fn check(
        &self,
        piece: &Piece,
        dest: Square,
        board: &Board,
        pieces: &PieceSet,
    ) -> Result<MoveKind, Rejection> {
        if !dest.is_valid() {
            return Err(Rejection::OffBoard);
        }
        if !board.is_empty(dest) {
            return Err(Rejection::Occupied);
        }

        if piece.is_king {
            self.check_king(piece, dest, board, pieces)
        } else {
            self.check_man(piece, dest, board, pieces)
        }
    }

    /// All destinations `piece` may legally reach
    pub fn legal_destinations(&self, piece: &Piece, board: &Board, pieces: &PieceSet) -> Vec<Square> {
        Square::all()
            .filter(|&dest| self.is_legal(piece, dest, board, pieces))
            .collect()
    }

    /// Whether any piece of `side` has a legal move
    pub fn has_any_move(&self, side: Side, board: &Board, pieces: &PieceSet) -> bool {
        pieces.of_side(side).any(|piece| {
            Square::all().any(|dest| self.is_legal(piece, dest, board, pieces))
        })
    }

    fn check_man(
        &self,
        piece: &Piece,
        dest: Square,
        board: &Board,
        pieces: &PieceSet,
    ) -> Result<MoveKind, Rejection> {
        let dc = dest.col - piece.square.col;
        let dr = dest.row - piece.square.row;

        // Applies to jumps as well as steps
        if dr * piece.side.forward() < 0 {
            return Err(Rejection::WrongDirection);
        }
        if dc.abs() != dr.abs() || dc == 0 {
            return Err(Rejection::NotDiagonal);
        }

        match dc.abs() {
            1 => Ok(MoveKind::Step),
            2 => {
                let over = piece.square.offset(dc / 2, dr / 2);
                if enemy_at(piece.side, over, board, pieces) {
                    Ok(MoveKind::Jump { over })
                } else {
                    Err(Rejection::NothingToCapture)
                }
            }
            _ => Err(Rejection::TooFar),
        }
    }

    fn check_king(
        &self,
        piece: &Piece,
        dest: Square,
        board: &Board,
        pieces: &PieceSet,
    ) -> Result<MoveKind, Rejection> {
        let dc = dest.col - piece.square.col;
        let dr = dest.row - piece.square.row;
        if dc.abs() != dr.abs() || dc == 0 {
            return Err(Rejection::NotDiagonal);
        }

        let (sc, sr) = (dc.signum(), dr.signum());
        let scan = scan_path(piece, dest, (sc, sr), board, pieces);

        let plain_traversal = !scan.friendly && scan.enemies.len() <= 1;
        let single_capture = !scan.friendly
            && scan.enemies.len() == 1
            && board.is_empty(scan.enemies[0].offset(sc, sr));

        if !(plain_traversal || single_capture) {
            return Err(Rejection::Blocked);
        }

        let over = match self.rules.king_pass {
            KingPass::Capture => scan.enemies.first().copied(),
            // Only a two-square jump lands the capture; longer slides leave
            // the passed enemy in place
            KingPass::Lenient if dc.abs() == 2 => scan.enemies.first().copied(),
            KingPass::Lenient => None,
        };
        Ok(MoveKind::KingSlide { over })
    }
}

/// Walk from the piece toward `dest`, exclusive of both ends
fn scan_path(
    piece: &Piece,
    dest: Square,
    (sc, sr): (i8, i8),
    board: &Board,
    pieces: &PieceSet,
) -> PathScan {
    let mut scan = PathScan {
        friendly: false,
        enemies: Vec::new(),
    };

    let mut current = piece.square.offset(sc, sr);
    while current != dest {
        if let Some(occupant) = board.cell_at(current).and_then(|id| pieces.get(id)) {
            if occupant.side == piece.side {
                scan.friendly = true;
            } else {
                scan.enemies.push(current);
            }
        }
        current = current.offset(sc, sr);
    }

    scan
}

fn enemy_at(side: Side, square: Square, board: &Board, pieces: &PieceSet) -> bool {
    board
        .cell_at(square)
        .and_then(|id| pieces.get(id))
        .map_or(false, |p| p.side != side)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::PieceId;

    /// Board and piece set from (side, square, is_king) triples
    fn position(setup: &[(Side, Square, bool)]) -> (Board, PieceSet) {
        let mut board = Board::new();
        let mut pieces = PieceSet::new();
        for (i, &(side, square, is_king)) in setup.iter().enumerate() {
            let mut piece = Piece::new(PieceId(i as u8), side, square);
            piece.is_king = is_king;
            board.place(piece.id, square);
            pieces.insert(piece);
        }
        (board, pieces)
    }

    fn sq(col: i8, row: i8) -> Square {
        Square::new(col, row)
    }

    #[test]
    fn test_white_man_steps_forward_only() {
        let (board, pieces) = position(&[(Side::White, sq(2, 1), false)]);
        let v = MoveValidator::default();
        let man = pieces.get(PieceId(0)).unwrap();

        assert_eq!(v.check(man, sq(1, 2), &board, &pieces), Ok(MoveKind::Step));
        assert_eq!(v.check(man, sq(3, 2), &board, &pieces), Ok(MoveKind::Step));
        assert_eq!(v.check(man, sq(1, 0), &board, &pieces), Err(Rejection::WrongDirection));
        assert_eq!(v.check(man, sq(3, 0), &board, &pieces), Err(Rejection::WrongDirection));
    }

    #[test]
    fn test_black_man_moves_down() {
        let (board, pieces) = position(&[(Side::Black, sq(5, 6), false)]);
        let v = MoveValidator::default();
        let man = pieces.get(PieceId(0)).unwrap();

        assert!(v.is_legal(man, sq(4, 5), &board, &pieces));
        assert!(v.is_legal(man, sq(6, 5), &board, &pieces));
        assert!(!v.is_legal(man, sq(4, 7), &board, &pieces));
    }

    #[test]
    fn test_man_jump_needs_enemy() {
        let (board, pieces) = position(&[
            (Side::White, sq(2, 1), false),
            (Side::Black, sq(3, 2), false),
            (Side::White, sq(1, 2), false),
        ]);
        let v = MoveValidator::default();
        let man = pieces.get(PieceId(0)).unwrap();

        assert_eq!(
            v.check(man, sq(4, 3), &board, &pieces),
            Ok(MoveKind::Jump { over: sq(3, 2) })
        );
        // Own piece in the middle
        assert_eq!(v.check(man, sq(0, 3), &board, &pieces), Err(Rejection::NothingToCapture));
    }

    #[test]
    fn test_man_cannot_jump_backward() {
        let (board, pieces) = position(&[
            (Side::White, sq(3, 4), false),
            (Side::Black, sq(2, 3), false),
        ]);
        let v = MoveValidator::default();
        let man = pieces.get(PieceId(0)).unwrap();
        assert_eq!(v.check(man, sq(1, 2), &board, &pieces), Err(Rejection::WrongDirection));
    }

    #[test]
    fn test_man_shape_rejections() {
        let (board, pieces) = position(&[(Side::Black, sq(5, 6), false)]);
        let v = MoveValidator::default();
        let man = pieces.get(PieceId(0)).unwrap();

        assert_eq!(v.check(man, sq(6, 4), &board, &pieces), Err(Rejection::NotDiagonal));
        assert_eq!(v.check(man, sq(2, 3), &board, &pieces), Err(Rejection::TooFar));
        assert_eq!(v.check(man, sq(5, 6), &board, &pieces), Err(Rejection::Occupied));
        assert_eq!(v.check(man, sq(4, -1), &board, &pieces), Err(Rejection::OffBoard));
    }

    #[test]
    fn test_king_slides_any_distance() {
        let (board, pieces) = position(&[(Side::White, sq(0, 7), true)]);
        let v = MoveValidator::default();
        let king = pieces.get(PieceId(0)).unwrap();

        assert_eq!(
            v.check(king, sq(7, 0), &board, &pieces),
            Ok(MoveKind::KingSlide { over: None })
        );
        assert_eq!(v.legal_destinations(king, &board, &pieces).len(), 7);
        assert_eq!(v.check(king, sq(0, 3), &board, &pieces), Err(Rejection::NotDiagonal));
    }

    #[test]
    fn test_king_blocked_by_friend_or_two_enemies() {
        let (board, pieces) = position(&[
            (Side::White, sq(0, 0), true),
            (Side::White, sq(2, 2), false),
            (Side::White, sq(7, 7), true),
            (Side::Black, sq(6, 6), false),
            (Side::Black, sq(4, 4), false),
        ]);
        let v = MoveValidator::default();

        let low = pieces.get(PieceId(0)).unwrap();
        assert_eq!(v.check(low, sq(3, 3), &board, &pieces), Err(Rejection::Blocked));
        assert!(v.is_legal(low, sq(1, 1), &board, &pieces));

        let high = pieces.get(PieceId(2)).unwrap();
        assert_eq!(v.check(high, sq(3, 3), &board, &pieces), Err(Rejection::Blocked));
        assert_eq!(
            v.check(high, sq(5, 5), &board, &pieces),
            Ok(MoveKind::KingSlide { over: Some(sq(6, 6)) })
        );
    }

    #[test]
    fn test_king_pass_rules() {
        let (board, pieces) = position(&[
            (Side::Black, sq(7, 0), true),
            (Side::White, sq(5, 2), false),
        ]);
        let king = pieces.get(PieceId(0)).unwrap();

        let capture = MoveValidator::default();
        assert_eq!(
            capture.check(king, sq(2, 5), &board, &pieces),
            Ok(MoveKind::KingSlide { over: Some(sq(5, 2)) })
        );

        let lenient = MoveValidator::new(RuleSet {
            king_pass: KingPass::Lenient,
            ..RuleSet::default()
        });
        assert_eq!(
            lenient.check(king, sq(2, 5), &board, &pieces),
            Ok(MoveKind::KingSlide { over: None })
        );
        assert_eq!(
            lenient.check(king, sq(4, 3), &board, &pieces),
            Ok(MoveKind::KingSlide { over: None })
        );
    }

    #[test]
    fn test_lenient_king_two_square_jump_captures() {
        let (board, pieces) = position(&[
            (Side::White, sq(1, 1), true),
            (Side::Black, sq(2, 2), false),
        ]);
        let king = pieces.get(PieceId(0)).unwrap();
        let lenient = MoveValidator::new(RuleSet {
            king_pass: KingPass::Lenient,
            ..RuleSet::default()
        });
        assert_eq!(
            lenient.check(king, sq(3, 3), &board, &pieces),
            Ok(MoveKind::KingSlide { over: Some(sq(2, 2)) })
        );
    }

    #[test]
    fn test_is_legal_is_idempotent() {
        let (board, pieces) = position(&[
            (Side::White, sq(2, 1), false),
            (Side::Black, sq(3, 2), false),
        ]);
        let v = MoveValidator::default();
        let man = pieces.get(PieceId(0)).unwrap();
        let first = v.is_legal(man, sq(4, 3), &board, &pieces);
        for _ in 0..5 {
            assert_eq!(v.is_legal(man, sq(4, 3), &board, &pieces), first);
        }
        assert!(first);
    }

    #[test]
    fn test_has_any_move() {
        // Black man on the bottom row can never move again
        let (board, pieces) = position(&[
            (Side::White, sq(4, 7), false),
            (Side::Black, sq(1, 0), false),
        ]);
        let v = MoveValidator::default();
        assert!(!v.has_any_move(Side::Black, &board, &pieces));
        assert!(!v.has_any_move(Side::White, &board, &pieces));
    }
}
