pub mod board;
pub mod cells;
pub mod error;
pub mod growth;
pub mod movegen;
pub mod moves;
pub mod piece;

#[cfg(target_arch = "wasm32")]
mod wasm_api;

pub use board::{Board, Outcome};
pub use cells::{CellSet, Position};
pub use error::{BoardError, MoveError};
pub use growth::{grow_board, grow_board_with, GrowthConfig};
pub use movegen::generate_moves;
pub use moves::Move;
pub use piece::{Color, Piece, PieceType};
