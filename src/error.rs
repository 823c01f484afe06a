//! Errors raised by the layer around the rule engine.
//!
//! Rule queries themselves never fail; these cover snapshots that break the
//! board invariants and ply requests the rules refuse.

use thiserror::Error;

use crate::cells::Position;
use crate::piece::{Color, PieceType};

/// A snapshot that breaks one of the board invariants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("piece {id} stands on {position}, which is not a playable cell")]
    PieceOffBoard { id: u32, position: Position },

    #[error("pieces {first} and {second} share cell {position}")]
    SharedCell {
        first: u32,
        second: u32,
        position: Position,
    },

    #[error("piece id {0} is used more than once")]
    DuplicateId(u32),

    #[error("{0:?} has more than one king")]
    MultipleKings(Color),
}

/// Reasons `Board::play` refuses a move.
#[derive(Debug, Error)]
pub enum MoveError {
    #[error("no piece at {0}")]
    NoPiece(Position),

    #[error("it is {expected:?}'s turn, not {found:?}'s")]
    WrongTurn { expected: Color, found: Color },

    #[error("{from} -> {to} is not a legal move")]
    Illegal { from: Position, to: Position },

    #[error("a pawn cannot promote to {0:?}")]
    BadPromotion(PieceType),

    #[error("invalid snapshot: {0}")]
    Board(#[from] BoardError),

    #[error("snapshot encoding: {0}")]
    Encoding(#[from] serde_json::Error),
}
