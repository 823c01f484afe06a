use serde::{Deserialize, Serialize};

use crate::cells::Position;
use crate::piece::{Piece, PieceType};

/// A transition request, and the record kept as `Board::last_move`.
///
/// `piece` is the mover as it stood before the move. `captured` includes a
/// pawn taken en passant, which does not sit on `to`.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Move {
    pub from: Position,
    pub to: Position,
    pub piece: Piece,
    pub captured: Option<Piece>,
}

impl Move {
    pub fn new(piece: Piece, to: Position, captured: Option<Piece>) -> Self {
        Move {
            from: piece.position,
            to,
            piece,
            captured,
        }
    }

    /// A pawn advancing two ranks; the only move that opens en passant.
    pub fn is_double_pawn_step(&self) -> bool {
        self.piece.piece_type == PieceType::Pawn
            && self.from.x == self.to.x
            && (self.to.y - self.from.y).abs() == 2
    }

    pub fn is_diagonal(&self) -> bool {
        self.from.x != self.to.x && self.from.y != self.to.y
    }

    /// A king hop of two files. Only castling produces one.
    pub fn is_castling(&self) -> bool {
        self.piece.piece_type == PieceType::King
            && self.from.y == self.to.y
            && (self.to.x - self.from.x).abs() == 2
    }
}
