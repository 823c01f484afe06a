use serde::{Deserialize, Serialize};

use crate::cells::Position;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Step along y a pawn of this color takes when advancing.
    pub fn pawn_direction(self) -> i32 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// Literal rank a pawn must stand on to be allowed the double step.
    pub fn pawn_start_rank(self) -> i32 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    /// Rank on which a pawn of this color promotes (the opposing back rank).
    pub fn promotion_rank(self) -> i32 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceType {
    /// Pieces a pawn may turn into.
    pub fn is_promotion_target(self) -> bool {
        matches!(
            self,
            PieceType::Queen | PieceType::Rook | PieceType::Bishop | PieceType::Knight
        )
    }
}

/// A piece on the board. Values are never edited in place: moving,
/// promoting or flagging a piece produces a new `Piece` with the same id.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub id: u32,
    pub piece_type: PieceType,
    pub color: Color,
    pub position: Position,
    pub has_moved: bool,
}

impl Piece {
    pub fn new(id: u32, piece_type: PieceType, color: Color, position: Position) -> Self {
        Piece {
            id,
            piece_type,
            color,
            position,
            has_moved: false,
        }
    }

    pub fn moved_to(self, position: Position) -> Self {
        Piece {
            position,
            has_moved: true,
            ..self
        }
    }

    pub fn promoted(self, piece_type: PieceType) -> Self {
        Piece { piece_type, ..self }
    }

    pub fn is_king_of(&self, color: Color) -> bool {
        self.piece_type == PieceType::King && self.color == color
    }
}
