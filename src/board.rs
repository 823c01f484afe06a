use std::collections::{BTreeSet, HashMap, HashSet};

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::cells::{CellSet, Position};
use crate::error::{BoardError, MoveError};
use crate::growth::{grow_board_with, GrowthConfig};
use crate::movegen::{generate_moves, is_square_attacked};
use crate::moves::Move;
use crate::piece::{Color, Piece, PieceType};

/// How a game ended for the side to move.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Outcome {
    Checkmate { winner: Color },
    Stalemate,
}

/// One instant of the game.
///
/// A `Board` is never edited by the rules: `apply_move`, `play` and `grow`
/// all hand back a new snapshot and leave `self` as it was, so old snapshots
/// stay valid for undo, rendering or replication.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Board {
    pub cells: CellSet,
    pub pieces: Vec<Piece>,
    pub turn: Color,
    pub last_move: Option<Move>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// A board with the given cells and no pieces. Useful for setting up test positions.
    pub fn empty(cells: CellSet) -> Self {
        Board {
            cells,
            pieces: Vec::new(),
            turn: Color::White,
            last_move: None,
        }
    }

    pub fn with_pieces(cells: CellSet, pieces: Vec<Piece>, turn: Color) -> Self {
        Board {
            cells,
            pieces,
            turn,
            last_move: None,
        }
    }

    /// Standard setup on an 8x8 rectangle. Black's back rank is y = 0,
    /// White's is y = 7; White moves first.
    pub fn new() -> Self {
        const BACK_RANK: [PieceType; 8] = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];

        let mut pieces = Vec::with_capacity(32);
        let mut next_id = 0u32;
        let mut place = |piece_type, color, x, y| {
            pieces.push(Piece::new(next_id, piece_type, color, Position::new(x, y)));
            next_id += 1;
        };

        // Black pieces (rows 0-1)
        for (x, &pt) in (0..).zip(BACK_RANK.iter()) {
            place(pt, Color::Black, x, 0);
        }
        for x in 0..8 {
            place(PieceType::Pawn, Color::Black, x, 1);
        }

        // White pieces (rows 6-7)
        for x in 0..8 {
            place(PieceType::Pawn, Color::White, x, 6);
        }
        for (x, &pt) in (0..).zip(BACK_RANK.iter()) {
            place(pt, Color::White, x, 7);
        }

        Board::with_pieces(CellSet::rectangle(8, 8), pieces, Color::White)
    }

    pub fn piece_at(&self, pos: Position) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.position == pos)
    }

    /// The cell exists and nothing stands on it.
    pub fn is_vacant(&self, pos: Position) -> bool {
        self.cells.contains(pos) && self.piece_at(pos).is_none()
    }

    pub fn find_king(&self, color: Color) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.is_king_of(color))
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = &Piece> + '_ {
        self.pieces.iter().filter(move |p| p.color == color)
    }

    /// A board without a king for `color` is never in check.
    pub fn is_in_check(&self, color: Color) -> bool {
        match self.find_king(color) {
            Some(king) => is_square_attacked(self, king.position, color.opposite()),
            None => false,
        }
    }

    /// Check-safe destinations for the piece on `pos`.
    pub fn legal_destinations(&self, pos: Position) -> BTreeSet<Position> {
        generate_moves(self, pos, false)
    }

    /// Every legal move for `color`, regardless of whose turn it is.
    pub fn legal_moves(&self, color: Color) -> Vec<Move> {
        self.pieces_of(color)
            .flat_map(|piece| {
                self.legal_destinations(piece.position)
                    .into_iter()
                    .map(move |to| self.move_for(piece, to))
            })
            .collect()
    }

    /// Stops at the first piece with somewhere to go.
    pub fn has_legal_move(&self, color: Color) -> bool {
        self.pieces_of(color)
            .any(|piece| !self.legal_destinations(piece.position).is_empty())
    }

    pub fn is_checkmate(&self, color: Color) -> bool {
        self.is_in_check(color) && !self.has_legal_move(color)
    }

    pub fn is_stalemate(&self, color: Color) -> bool {
        !self.is_in_check(color) && !self.has_legal_move(color)
    }

    /// Terminal state for the side to move, if any.
    pub fn outcome(&self) -> Option<Outcome> {
        if self.has_legal_move(self.turn) {
            return None;
        }
        let outcome = if self.is_in_check(self.turn) {
            Outcome::Checkmate {
                winner: self.turn.opposite(),
            }
        } else {
            Outcome::Stalemate
        };
        debug!("{:?} to move: {:?}", self.turn, outcome);
        Some(outcome)
    }

    /// Describe `piece` moving to `to` on this board, filling in the capture.
    /// A pawn stepping diagonally onto an empty cell captures en passant.
    pub fn move_for(&self, piece: &Piece, to: Position) -> Move {
        let captured = match self.piece_at(to) {
            Some(p) => Some(*p),
            None if piece.piece_type == PieceType::Pawn && to.x != piece.position.x => {
                self.piece_at(Position::new(to.x, piece.position.y)).copied()
            }
            None => None,
        };
        Move::new(*piece, to, captured)
    }

    /// Move simulation: relocate the piece on `mv.from`, removing whatever
    /// stood on `mv.to` (and the pawn passed by an en passant capture).
    ///
    /// Turn, `last_move`, promotion and the castling rook are left alone;
    /// `play` layers those on top.
    pub fn apply_move(&self, mv: &Move) -> Board {
        let mover = match self.piece_at(mv.from) {
            Some(p) => *p,
            None => return self.clone(),
        };

        let en_passant_victim = if mover.piece_type == PieceType::Pawn
            && mv.is_diagonal()
            && self.piece_at(mv.to).is_none()
        {
            Some(Position::new(mv.to.x, mv.from.y))
        } else {
            None
        };

        let pieces = self
            .pieces
            .iter()
            .filter(|p| p.position != mv.to && Some(p.position) != en_passant_victim)
            .map(|p| if p.id == mover.id { p.moved_to(mv.to) } else { *p })
            .collect();

        Board {
            cells: self.cells.clone(),
            pieces,
            turn: self.turn,
            last_move: self.last_move,
        }
    }

    /// A full ply for the side to move: validate, simulate, carry the rook on
    /// castling, promote, record the move and pass the turn.
    ///
    /// `promotion` defaults to a queen and is ignored for non-promoting moves.
    pub fn play(
        &self,
        from: Position,
        to: Position,
        promotion: Option<PieceType>,
    ) -> Result<Board, MoveError> {
        let piece = *self.piece_at(from).ok_or(MoveError::NoPiece(from))?;
        if piece.color != self.turn {
            return Err(MoveError::WrongTurn {
                expected: self.turn,
                found: piece.color,
            });
        }
        if let Some(pt) = promotion {
            if !pt.is_promotion_target() {
                return Err(MoveError::BadPromotion(pt));
            }
        }
        if !self.legal_destinations(from).contains(&to) {
            debug!("rejected {:?} {} -> {}", piece.piece_type, from, to);
            return Err(MoveError::Illegal { from, to });
        }

        let mv = self.move_for(&piece, to);
        let mut next = self.apply_move(&mv);

        if mv.is_castling() {
            next.carry_castling_rook(&mv);
        }
        if piece.piece_type == PieceType::Pawn && to.y == piece.color.promotion_rank() {
            let promote_to = promotion.unwrap_or(PieceType::Queen);
            for p in next.pieces.iter_mut().filter(|p| p.id == piece.id) {
                *p = p.promoted(promote_to);
            }
        }

        next.last_move = Some(mv);
        next.turn = self.turn.opposite();
        debug!(
            "{:?} {:?} {} -> {}{}",
            piece.color,
            piece.piece_type,
            from,
            to,
            if mv.captured.is_some() { " (capture)" } else { "" }
        );
        Ok(next)
    }

    /// Bring the nearest unmoved rook beyond the king's path to the cell the
    /// king just crossed.
    pub(crate) fn carry_castling_rook(&mut self, mv: &Move) {
        let dir = (mv.to.x - mv.from.x).signum();
        let rook_id = self
            .pieces
            .iter()
            .filter(|p| {
                p.piece_type == PieceType::Rook
                    && p.color == mv.piece.color
                    && !p.has_moved
                    && p.position.y == mv.from.y
                    && (p.position.x - mv.from.x) * dir > 0
            })
            .min_by_key(|p| (p.position.x - mv.from.x).abs())
            .map(|p| p.id);

        let crossed = mv.from.offset(dir, 0);
        for p in self.pieces.iter_mut().filter(|p| Some(p.id) == rook_id) {
            *p = p.moved_to(crossed);
        }
    }

    /// Enlarge the board with `grow_board_with`. Pieces, turn and last move
    /// carry over unchanged.
    pub fn grow_with<R: Rng + ?Sized>(&self, config: &GrowthConfig, rng: &mut R) -> (Board, usize) {
        let (cells, added) = grow_board_with(&self.cells, config, rng);
        let grown = Board {
            cells,
            pieces: self.pieces.clone(),
            turn: self.turn,
            last_move: self.last_move,
        };
        (grown, added)
    }

    pub fn grow(&self) -> (Board, usize) {
        self.grow_with(&GrowthConfig::default(), &mut rand::thread_rng())
    }

    /// Check the invariants the rules take for granted. Snapshots built by
    /// hand or received from a peer should pass through here first.
    pub fn validate(&self) -> Result<(), BoardError> {
        let mut ids = HashSet::new();
        let mut occupied: HashMap<Position, u32> = HashMap::new();
        let mut kings: HashSet<Color> = HashSet::new();

        for p in &self.pieces {
            if !self.cells.contains(p.position) {
                return Err(BoardError::PieceOffBoard {
                    id: p.id,
                    position: p.position,
                });
            }
            if !ids.insert(p.id) {
                return Err(BoardError::DuplicateId(p.id));
            }
            if let Some(first) = occupied.insert(p.position, p.id) {
                return Err(BoardError::SharedCell {
                    first,
                    second: p.id,
                    position: p.position,
                });
            }
            if p.piece_type == PieceType::King && !kings.insert(p.color) {
                return Err(BoardError::MultipleKings(p.color));
            }
        }
        Ok(())
    }

    /// Encoding used to replicate a snapshot to a peer.
    pub fn to_json(&self) -> Result<String, MoveError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode and validate a replicated snapshot.
    pub fn from_json(json: &str) -> Result<Board, MoveError> {
        let board: Board = serde_json::from_str(json)?;
        board.validate()?;
        Ok(board)
    }
}
