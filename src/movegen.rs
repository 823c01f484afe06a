// =============================================================================
// Move generation
//
// Every rule here asks the board's cell set whether a square exists instead of
// testing coordinate ranges: the board may be any shape and keeps growing.
//
// `ignore_check = true` yields the raw movement rule of a piece and is what
// the attack test is built from. `ignore_check = false` is the player-facing
// entry point: it adds castling and drops every destination that would leave
// the mover's own king attacked, found by simulating the move and re-running
// the attack test. Pins and "the king may not step into check" both fall out
// of that single filter.
// =============================================================================

use std::collections::BTreeSet;

use crate::board::Board;
use crate::cells::Position;
use crate::piece::{Color, Piece, PieceType};

const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (-2, -1), (-2, 1), (-1, -2), (-1, 2),
    (1, -2), (1, 2), (2, -1), (2, 1),
];

const KING_OFFSETS: [(i32, i32); 8] = [
    (-1, -1), (-1, 0), (-1, 1), (0, -1),
    (0, 1), (1, -1), (1, 0), (1, 1),
];

const ROOK_DIRS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

const BISHOP_DIRS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

const QUEEN_DIRS: [(i32, i32); 8] = [
    (0, 1), (0, -1), (1, 0), (-1, 0),
    (1, 1), (1, -1), (-1, 1), (-1, -1),
];

/// Destinations reachable by the piece on `pos`.
///
/// An empty square yields an empty set. With `ignore_check` set the result is
/// the bare movement rule: no castling, no king-safety filter. Never show that
/// set to a player as "legal".
pub fn generate_moves(board: &Board, pos: Position, ignore_check: bool) -> BTreeSet<Position> {
    let piece = match board.piece_at(pos) {
        Some(p) => *p,
        None => return BTreeSet::new(),
    };

    let mut targets = Vec::new();
    match piece.piece_type {
        PieceType::Pawn => generate_pawn_moves(board, &piece, &mut targets),
        PieceType::Knight => generate_step_moves(board, &piece, &KNIGHT_OFFSETS, &mut targets),
        PieceType::Bishop => generate_sliding_moves(board, &piece, &BISHOP_DIRS, &mut targets),
        PieceType::Rook => generate_sliding_moves(board, &piece, &ROOK_DIRS, &mut targets),
        PieceType::Queen => generate_sliding_moves(board, &piece, &QUEEN_DIRS, &mut targets),
        PieceType::King => {
            generate_step_moves(board, &piece, &KING_OFFSETS, &mut targets);
            if !ignore_check {
                generate_castling_moves(board, &piece, &mut targets);
            }
        }
    }

    if ignore_check {
        return targets.into_iter().collect();
    }
    targets
        .into_iter()
        .filter(|&to| !leaves_king_in_check(board, &piece, to))
        .collect()
}

/// Legality filter: would moving `piece` to `to` leave its own king attacked?
pub fn leaves_king_in_check(board: &Board, piece: &Piece, to: Position) -> bool {
    let mv = board.move_for(piece, to);
    board.apply_move(&mv).is_in_check(piece.color)
}

/// True if some piece of color `by` could land on `target` under its bare
/// movement rule. Pawns only count on their two forward diagonals.
pub fn is_square_attacked(board: &Board, target: Position, by: Color) -> bool {
    board
        .pieces
        .iter()
        .filter(|p| p.color == by)
        .any(|p| attacks(board, p, target))
}

fn attacks(board: &Board, piece: &Piece, target: Position) -> bool {
    if piece.piece_type == PieceType::Pawn {
        let dy = target.y - piece.position.y;
        let dx = target.x - piece.position.x;
        return dy == piece.color.pawn_direction()
            && dx.abs() == 1
            && board.cells.contains(target);
    }
    generate_moves(board, piece.position, true).contains(&target)
}

fn generate_pawn_moves(board: &Board, pawn: &Piece, targets: &mut Vec<Position>) {
    let dir = pawn.color.pawn_direction();
    let forward = pawn.position.offset(0, dir);

    // Single push, then the double step from the literal start rank.
    // `has_moved` plays no part here.
    if board.is_vacant(forward) {
        targets.push(forward);
        if pawn.position.y == pawn.color.pawn_start_rank() {
            let double = forward.offset(0, dir);
            if board.is_vacant(double) {
                targets.push(double);
            }
        }
    }

    for dx in [-1, 1] {
        let diagonal = pawn.position.offset(dx, dir);
        match board.piece_at(diagonal) {
            Some(p) if p.color != pawn.color => targets.push(diagonal),
            Some(_) => {}
            None => {
                if board.cells.contains(diagonal) && en_passant_available(board, pawn, diagonal) {
                    targets.push(diagonal);
                }
            }
        }
    }
}

/// The last move was an enemy pawn's double step that ended beside `pawn`,
/// on the file of `diagonal`.
fn en_passant_available(board: &Board, pawn: &Piece, diagonal: Position) -> bool {
    match &board.last_move {
        Some(last) => {
            last.is_double_pawn_step()
                && last.piece.color != pawn.color
                && last.to.x == diagonal.x
                && last.to.y == pawn.position.y
        }
        None => false,
    }
}

fn generate_step_moves(
    board: &Board,
    piece: &Piece,
    offsets: &[(i32, i32)],
    targets: &mut Vec<Position>,
) {
    for &(dx, dy) in offsets {
        let to = piece.position.offset(dx, dy);
        if !board.cells.contains(to) {
            continue;
        }
        if board.piece_at(to).map(|p| p.color == piece.color).unwrap_or(false) {
            continue;
        }
        targets.push(to);
    }
}

fn generate_sliding_moves(
    board: &Board,
    piece: &Piece,
    directions: &[(i32, i32)],
    targets: &mut Vec<Position>,
) {
    for &(dx, dy) in directions {
        let mut next = piece.position.offset(dx, dy);
        while board.cells.contains(next) {
            if let Some(p) = board.piece_at(next) {
                if p.color != piece.color {
                    targets.push(next);
                }
                break;
            }
            targets.push(next);
            next = next.offset(dx, dy);
        }
    }
}

fn generate_castling_moves(board: &Board, king: &Piece, targets: &mut Vec<Position>) {
    if king.has_moved || board.is_in_check(king.color) {
        return;
    }

    let rooks = board.pieces.iter().filter(|p| {
        p.piece_type == PieceType::Rook
            && p.color == king.color
            && !p.has_moved
            && p.position.y == king.position.y
    });

    for rook in rooks {
        let gap = rook.position.x - king.position.x;
        // The king hops two cells and the rook lands on the one it crossed,
        // so there must be at least two cells between them.
        if gap.abs() < 3 {
            continue;
        }
        let dir = gap.signum();

        let path_clear = (1..gap.abs()).all(|i| board.is_vacant(king.position.offset(dir * i, 0)));
        if !path_clear {
            continue;
        }

        let path_safe = (1..=2).all(|i| {
            !leaves_king_in_check(board, king, king.position.offset(dir * i, 0))
        });
        let landing = king.position.offset(dir * 2, 0);
        if path_safe && !castle_leaves_king_in_check(board, king, landing) {
            targets.push(landing);
        }
    }
}

/// The whole castle, rook included. On a grown rank the rook may be the only
/// thing standing between the king and an enemy slider further along.
fn castle_leaves_king_in_check(board: &Board, king: &Piece, landing: Position) -> bool {
    let mv = board.move_for(king, landing);
    let mut after = board.apply_move(&mv);
    after.carry_castling_rook(&mv);
    after.is_in_check(king.color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cells::CellSet;

    fn piece(id: u32, piece_type: PieceType, color: Color, x: i32, y: i32) -> Piece {
        Piece::new(id, piece_type, color, Position::new(x, y))
    }

    fn board_with(pieces: Vec<Piece>) -> Board {
        Board::with_pieces(CellSet::rectangle(8, 8), pieces, Color::White)
    }

    fn set(cells: &[(i32, i32)]) -> BTreeSet<Position> {
        cells.iter().map(|&c| Position::from(c)).collect()
    }

    #[test]
    fn empty_square_has_no_moves() {
        let board = Board::new();
        assert!(generate_moves(&board, Position::new(3, 4), false).is_empty());
        assert!(generate_moves(&board, Position::new(30, 40), true).is_empty());
    }

    #[test]
    fn knight_respects_cell_membership() {
        let board = board_with(vec![piece(0, PieceType::Knight, Color::White, 0, 0)]);
        assert_eq!(generate_moves(&board, Position::new(0, 0), true), set(&[(1, 2), (2, 1)]));

        // Remove (2, 1) from the board: that jump disappears.
        let cells: CellSet = CellSet::rectangle(8, 8)
            .iter()
            .filter(|&p| p != Position::new(2, 1))
            .collect();
        let holed = Board::with_pieces(
            cells,
            vec![piece(0, PieceType::Knight, Color::White, 0, 0)],
            Color::White,
        );
        assert_eq!(generate_moves(&holed, Position::new(0, 0), true), set(&[(1, 2)]));
    }

    #[test]
    fn slider_stops_where_the_board_ends() {
        // An L-shaped board: a bishop cannot cut across the missing corner.
        let cells: CellSet = vec![
            Position::new(0, 0),
            Position::new(1, 0),
            Position::new(2, 0),
            Position::new(0, 1),
            Position::new(0, 2),
            Position::new(2, 2),
        ]
        .into();
        let board = Board::with_pieces(
            cells,
            vec![piece(0, PieceType::Bishop, Color::White, 0, 0)],
            Color::White,
        );
        assert!(generate_moves(&board, Position::new(0, 0), true).is_empty());
    }

    #[test]
    fn pawn_does_not_capture_straight_ahead() {
        let board = board_with(vec![
            piece(0, PieceType::Pawn, Color::White, 4, 6),
            piece(1, PieceType::Pawn, Color::Black, 4, 5),
        ]);
        assert!(generate_moves(&board, Position::new(4, 6), true).is_empty());
    }

    #[test]
    fn double_step_uses_literal_start_rank() {
        // Flagged as moved, but standing on its start rank: may still double step.
        let mut pawn = piece(0, PieceType::Pawn, Color::Black, 2, 1);
        pawn.has_moved = true;
        let board = board_with(vec![pawn]);
        assert_eq!(generate_moves(&board, Position::new(2, 1), true), set(&[(2, 2), (2, 3)]));

        // Off the start rank: no double step even though it never moved.
        let board = board_with(vec![piece(0, PieceType::Pawn, Color::Black, 2, 2)]);
        assert_eq!(generate_moves(&board, Position::new(2, 2), true), set(&[(2, 3)]));
    }

    #[test]
    fn double_step_needs_the_far_cell_to_exist() {
        let cells: CellSet = vec![Position::new(0, 6), Position::new(0, 5)].into();
        let board = Board::with_pieces(
            cells,
            vec![piece(0, PieceType::Pawn, Color::White, 0, 6)],
            Color::White,
        );
        assert_eq!(generate_moves(&board, Position::new(0, 6), true), set(&[(0, 5)]));
    }

    #[test]
    fn pinned_piece_cannot_leave_the_line() {
        let board = board_with(vec![
            piece(0, PieceType::King, Color::White, 4, 7),
            piece(1, PieceType::Knight, Color::White, 4, 5),
            piece(2, PieceType::Rook, Color::Black, 4, 0),
        ]);
        assert!(!generate_moves(&board, Position::new(4, 5), true).is_empty());
        assert!(generate_moves(&board, Position::new(4, 5), false).is_empty());
    }

    #[test]
    fn king_cannot_step_into_check() {
        let board = board_with(vec![
            piece(0, PieceType::King, Color::White, 4, 7),
            piece(1, PieceType::Rook, Color::Black, 3, 0),
        ]);
        let moves = generate_moves(&board, Position::new(4, 7), false);
        assert!(!moves.contains(&Position::new(3, 7)));
        assert!(!moves.contains(&Position::new(3, 6)));
        assert!(moves.contains(&Position::new(5, 7)));
    }

    #[test]
    fn pawn_attacks_only_diagonally() {
        let board = board_with(vec![piece(0, PieceType::Pawn, Color::Black, 3, 3)]);
        assert!(is_square_attacked(&board, Position::new(2, 4), Color::Black));
        assert!(is_square_attacked(&board, Position::new(4, 4), Color::Black));
        assert!(!is_square_attacked(&board, Position::new(3, 4), Color::Black));
        assert!(!is_square_attacked(&board, Position::new(2, 2), Color::Black));
    }

    fn castling_board(extra: Vec<Piece>) -> Board {
        let mut pieces = vec![
            piece(0, PieceType::King, Color::White, 4, 7),
            piece(1, PieceType::Rook, Color::White, 0, 7),
            piece(2, PieceType::Rook, Color::White, 7, 7),
            piece(3, PieceType::King, Color::Black, 4, 0),
        ];
        pieces.extend(extra);
        board_with(pieces)
    }

    #[test]
    fn castles_both_ways_when_clear() {
        let board = castling_board(vec![]);
        let moves = generate_moves(&board, Position::new(4, 7), false);
        assert!(moves.contains(&Position::new(6, 7)));
        assert!(moves.contains(&Position::new(2, 7)));
        // never in the raw rule set
        let raw = generate_moves(&board, Position::new(4, 7), true);
        assert!(!raw.contains(&Position::new(6, 7)));
        assert!(!raw.contains(&Position::new(2, 7)));
    }

    #[test]
    fn castling_refused_after_king_moved() {
        let mut board = castling_board(vec![]);
        board.pieces[0].has_moved = true;
        let moves = generate_moves(&board, Position::new(4, 7), false);
        assert!(!moves.contains(&Position::new(6, 7)));
        assert!(!moves.contains(&Position::new(2, 7)));
    }

    #[test]
    fn castling_refused_after_rook_moved() {
        let mut board = castling_board(vec![]);
        board.pieces[2].has_moved = true;
        let moves = generate_moves(&board, Position::new(4, 7), false);
        assert!(!moves.contains(&Position::new(6, 7)));
        assert!(moves.contains(&Position::new(2, 7)));
    }

    #[test]
    fn castling_refused_through_occupied_cell() {
        // b-file knight blocks the long side only; the king never crosses b.
        let board = castling_board(vec![piece(4, PieceType::Knight, Color::White, 1, 7)]);
        let moves = generate_moves(&board, Position::new(4, 7), false);
        assert!(!moves.contains(&Position::new(2, 7)));
        assert!(moves.contains(&Position::new(6, 7)));
    }

    #[test]
    fn castling_refused_through_attacked_cell() {
        // Black rook eyes f8-equivalent (5, 7): the king would pass through check.
        let board = castling_board(vec![piece(4, PieceType::Rook, Color::Black, 5, 2)]);
        let moves = generate_moves(&board, Position::new(4, 7), false);
        assert!(!moves.contains(&Position::new(6, 7)));
        assert!(moves.contains(&Position::new(2, 7)));
    }

    #[test]
    fn castling_refused_onto_attacked_cell() {
        let board = castling_board(vec![piece(4, PieceType::Rook, Color::Black, 2, 2)]);
        let moves = generate_moves(&board, Position::new(4, 7), false);
        assert!(!moves.contains(&Position::new(2, 7)));
        assert!(moves.contains(&Position::new(6, 7)));
    }

    #[test]
    fn castling_refused_out_of_check() {
        let board = castling_board(vec![piece(4, PieceType::Rook, Color::Black, 4, 2)]);
        let moves = generate_moves(&board, Position::new(4, 7), false);
        assert!(!moves.contains(&Position::new(6, 7)));
        assert!(!moves.contains(&Position::new(2, 7)));
    }

    #[test]
    fn castling_refused_when_the_rook_was_the_shield() {
        // The rank grew past the rook; a black rook waits at the far end.
        let mut cells = CellSet::rectangle(8, 8);
        cells.insert(Position::new(8, 7));
        cells.insert(Position::new(9, 7));
        let board = Board::with_pieces(
            cells,
            vec![
                piece(0, PieceType::King, Color::White, 4, 7),
                piece(1, PieceType::Rook, Color::White, 7, 7),
                piece(2, PieceType::Rook, Color::Black, 9, 7),
                piece(3, PieceType::King, Color::Black, 0, 0),
            ],
            Color::White,
        );
        // The king alone would be safe on both crossed cells.
        assert!(!leaves_king_in_check(&board, &board.pieces[0], Position::new(6, 7)));
        assert!(!generate_moves(&board, Position::new(4, 7), false).contains(&Position::new(6, 7)));
        assert!(matches!(
            board.play(Position::new(4, 7), Position::new(6, 7), None),
            Err(crate::error::MoveError::Illegal { .. })
        ));
    }

    #[test]
    fn castling_refused_across_a_missing_cell() {
        let cells: CellSet = CellSet::rectangle(8, 8)
            .iter()
            .filter(|&p| p != Position::new(5, 7))
            .collect();
        let board = Board::with_pieces(
            cells,
            vec![
                piece(0, PieceType::King, Color::White, 4, 7),
                piece(2, PieceType::Rook, Color::White, 7, 7),
            ],
            Color::White,
        );
        assert!(!generate_moves(&board, Position::new(4, 7), false).contains(&Position::new(6, 7)));
    }
}
