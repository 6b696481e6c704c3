use rayon::prelude::*;

use crate::game::{apply_move, GameState};
use crate::legality::all_legal_moves;
use crate::types::{CapturedLedger, CastlingRights, Position};

/// Count the leaf positions reachable in exactly `depth` plies.
///
/// Walks the same path the game takes for a real move, so castling rights and the
/// capture ledger evolve exactly as in play. The root moves are split across threads.
pub fn perft(state: &GameState, rights: &CastlingRights, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let ledger = CapturedLedger::new();
    all_legal_moves(&state.board, state.side_to_move, rights)
        .into_par_iter()
        .map(|(from, to)| match apply_move(state, rights, &ledger, from, to) {
            Ok(result) => perft_serial(&result.state, &result.rights, &result.ledger, depth - 1),
            Err(e) => {
                log::error!("generated move was rejected: {e}");
                0
            }
        })
        .sum()
}

/// Node count per root move, sorted by origin then destination
pub fn perft_divide(
    state: &GameState,
    rights: &CastlingRights,
    depth: u8,
) -> Vec<((Position, Position), u64)> {
    let ledger = CapturedLedger::new();
    let mut split: Vec<_> = all_legal_moves(&state.board, state.side_to_move, rights)
        .into_par_iter()
        .filter_map(|(from, to)| {
            let result = apply_move(state, rights, &ledger, from, to).ok()?;
            let nodes = perft_serial(
                &result.state,
                &result.rights,
                &result.ledger,
                depth.saturating_sub(1),
            );
            Some(((from, to), nodes))
        })
        .collect();
    split.sort();
    split
}

fn perft_serial(
    state: &GameState,
    rights: &CastlingRights,
    ledger: &CapturedLedger,
    depth: u8,
) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = all_legal_moves(&state.board, state.side_to_move, rights);
    if depth == 1 {
        return moves.len() as u64;
    }
    moves
        .into_iter()
        .filter_map(|(from, to)| apply_move(state, rights, ledger, from, to).ok())
        .map(|result| perft_serial(&result.state, &result.rights, &result.ledger, depth - 1))
        .sum()
}
