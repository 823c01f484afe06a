use crate::board::{Board, Outcome};
use crate::cells::Position;
use crate::piece::{Color, PieceType};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[derive(Serialize)]
struct PieceJson {
    id: u32,
    piece_type: String,
    color: String,
    at: [i32; 2],
}

#[derive(Serialize)]
struct BoardState {
    cells: Vec<[i32; 2]>,
    pieces: Vec<PieceJson>,
    current_turn: String,
    game_over: bool,
    result: Option<String>,
    is_in_check: bool,
    last_move: Option<[[i32; 2]; 2]>,
}

#[derive(Serialize)]
struct MoveResult {
    #[serde(flatten)]
    board_state: Option<BoardState>,
    error: Option<String>,
}

#[derive(Serialize)]
struct GrowResult {
    #[serde(flatten)]
    board_state: BoardState,
    added: usize,
}

fn piece_type_to_string(pt: PieceType) -> String {
    match pt {
        PieceType::King => "King".to_string(),
        PieceType::Queen => "Queen".to_string(),
        PieceType::Rook => "Rook".to_string(),
        PieceType::Bishop => "Bishop".to_string(),
        PieceType::Knight => "Knight".to_string(),
        PieceType::Pawn => "Pawn".to_string(),
    }
}

fn color_to_string(c: Color) -> String {
    match c {
        Color::White => "White".to_string(),
        Color::Black => "Black".to_string(),
    }
}

fn string_to_piece_type(s: &str) -> Option<PieceType> {
    match s {
        "Queen" => Some(PieceType::Queen),
        "Rook" => Some(PieceType::Rook),
        "Bishop" => Some(PieceType::Bishop),
        "Knight" => Some(PieceType::Knight),
        _ => None,
    }
}

fn xy(p: Position) -> [i32; 2] {
    [p.x, p.y]
}

fn result_string(outcome: Outcome) -> String {
    match outcome {
        Outcome::Checkmate { winner: Color::White } => "White wins".to_string(),
        Outcome::Checkmate { winner: Color::Black } => "Black wins".to_string(),
        Outcome::Stalemate => "Draw".to_string(),
    }
}

fn build_board_state(board: &Board) -> BoardState {
    let outcome = board.outcome();
    BoardState {
        cells: board.cells.iter().map(xy).collect(),
        pieces: board
            .pieces
            .iter()
            .map(|p| PieceJson {
                id: p.id,
                piece_type: piece_type_to_string(p.piece_type),
                color: color_to_string(p.color),
                at: xy(p.position),
            })
            .collect(),
        current_turn: color_to_string(board.turn),
        game_over: outcome.is_some(),
        result: outcome.map(result_string),
        is_in_check: board.is_in_check(board.turn),
        last_move: board.last_move.map(|m| [xy(m.from), xy(m.to)]),
    }
}

fn to_js<T: Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}

fn error_result(message: String) -> JsValue {
    to_js(&MoveResult {
        board_state: None,
        error: Some(message),
    })
}

#[wasm_bindgen]
pub struct Game {
    board: Board,
}

#[wasm_bindgen]
impl Game {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Game {
        // A second Game in the same page finds the logger already installed.
        let _ = console_log::init_with_level(log::Level::Debug);
        Game { board: Board::new() }
    }

    pub fn get_board_state(&self) -> JsValue {
        to_js(&build_board_state(&self.board))
    }

    pub fn make_move(
        &mut self,
        from_x: i32,
        from_y: i32,
        to_x: i32,
        to_y: i32,
        promotion: Option<String>,
    ) -> JsValue {
        if self.board.outcome().is_some() {
            return error_result("Game is already over".to_string());
        }

        let promo_pt = promotion.as_deref().and_then(string_to_piece_type);
        match self.board.play(
            Position::new(from_x, from_y),
            Position::new(to_x, to_y),
            promo_pt,
        ) {
            Ok(next) => {
                self.board = next;
                to_js(&build_board_state(&self.board))
            }
            Err(e) => error_result(e.to_string()),
        }
    }

    pub fn get_legal_moves_for_square(&self, x: i32, y: i32) -> JsValue {
        let pos = Position::new(x, y);
        let owned = self
            .board
            .piece_at(pos)
            .map(|p| p.color == self.board.turn)
            .unwrap_or(false);
        let targets: Vec<[i32; 2]> = if owned {
            self.board.legal_destinations(pos).into_iter().map(xy).collect()
        } else {
            Vec::new()
        };
        to_js(&targets)
    }

    pub fn grow_board(&mut self) -> JsValue {
        let (grown, added) = self.board.grow();
        self.board = grown;
        to_js(&GrowResult {
            board_state: build_board_state(&self.board),
            added,
        })
    }

    /// Snapshot for a remote peer.
    pub fn export_state(&self) -> Option<String> {
        self.board.to_json().ok()
    }

    /// Replace the local snapshot with one received from a peer.
    pub fn import_state(&mut self, json: &str) -> JsValue {
        match Board::from_json(json) {
            Ok(board) => {
                self.board = board;
                to_js(&build_board_state(&self.board))
            }
            Err(e) => error_result(e.to_string()),
        }
    }
}
