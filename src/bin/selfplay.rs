use rand::seq::SliceRandom;

use sprawl_chess::board::{Board, Outcome};

const MAX_PLIES: u32 = 300;
const GROW_EVERY: u32 = 10;

fn main() {
    env_logger::init();

    let mut rng = rand::thread_rng();
    let mut board = Board::new();
    let mut plies = 0;

    while plies < MAX_PLIES {
        if board.outcome().is_some() {
            break;
        }
        let moves = board.legal_moves(board.turn);
        let Some(mv) = moves.choose(&mut rng) else {
            break;
        };
        board = match board.play(mv.from, mv.to, None) {
            Ok(next) => next,
            Err(e) => {
                eprintln!("engine refused its own move: {e}");
                return;
            }
        };
        plies += 1;

        if plies % GROW_EVERY == 0 {
            let (grown, added) = board.grow();
            board = grown;
            println!("ply {plies}: board grew by {added} to {} cells", board.cells.len());
        }
    }

    let result = match board.outcome() {
        Some(Outcome::Checkmate { winner }) => format!("{winner:?} wins by checkmate"),
        Some(Outcome::Stalemate) => "stalemate".to_string(),
        None => "ongoing".to_string(),
    };
    eprintln!("Game over after {plies} plies: {result}");
}
