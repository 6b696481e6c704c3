//! Legal move filtering by brute-force simulation.
//!
//! Every query rescans the board: each candidate move is played on a copy of the
//! board and kept only if the mover's king is not attacked afterwards. Nothing is
//! cached between calls.

use crate::board::Board;
use crate::movegen::{pseudo_moves, pseudo_moves_with};
use crate::types::{CastleSide, CastlingRights, Color, PieceKind, Position, SideRights, Status};

/// Is any piece of `by` able to move onto `target`?
///
/// Uses the same pseudo-moves the pieces would play, with castling switched off since
/// a castling king never lands on an occupied square.
pub fn is_square_attacked(board: &Board, target: Position, by: Color) -> bool {
    board
        .pieces(by)
        .any(|(pos, _)| pseudo_moves_with(board, pos, SideRights::NONE, true).contains(&target))
}

/// Is the king of `color` attacked?
///
/// A board without a king of `color` answers `true`. The engine never builds such a
/// board itself, so this only happens when a collaborator injects a broken position.
pub fn is_in_check(board: &Board, color: Color) -> bool {
    match board.find_king(color) {
        Some(king) => is_square_attacked(board, king, color.other_color()),
        None => {
            log::warn!("no {} king on the board, reporting check", color.to_human());
            true
        }
    }
}

/// Legal destinations of the piece on `pos`, in generation order.
///
/// Empty and off-board squares have no moves.
pub fn legal_moves(board: &Board, pos: Position, rights: &CastlingRights) -> Vec<Position> {
    let Some(piece) = board.piece_at(pos) else {
        return vec![];
    };
    let color = piece.color;

    pseudo_moves(board, pos, rights)
        .into_iter()
        .filter(|&to| {
            // kings are never captured, only mated
            if board.piece_at(to).is_some_and(|target| target.kind == PieceKind::King) {
                return false;
            }
            if piece.kind == PieceKind::King {
                if let Some(side) = CastleSide::from_king_move(color, pos, to) {
                    if !castle_path_is_safe(board, pos, side, color) {
                        return false;
                    }
                }
            }
            let (after, _) = board.execute_move(pos, to);
            !is_in_check(&after, color)
        })
        .collect()
}

/// A king may not castle out of check or across an attacked square.
/// The landing square is covered by the ordinary self-check test.
fn castle_path_is_safe(board: &Board, king: Position, side: CastleSide, color: Color) -> bool {
    if is_in_check(board, color) {
        return false;
    }
    let transit = Position::new(king.row, side.transit_col());
    let (after, _) = board.execute_move(king, transit);
    !is_in_check(&after, color)
}

/// Every legal `(from, to)` pair for `color`, row by row
pub fn all_legal_moves(
    board: &Board,
    color: Color,
    rights: &CastlingRights,
) -> Vec<(Position, Position)> {
    board
        .pieces(color)
        .flat_map(|(from, _)| {
            legal_moves(board, from, rights)
                .into_iter()
                .map(move |to| (from, to))
        })
        .collect()
}

pub fn has_any_legal_move(board: &Board, color: Color, rights: &CastlingRights) -> bool {
    board
        .pieces(color)
        .any(|(from, _)| !legal_moves(board, from, rights).is_empty())
}

/// Check marker and game status for `side_to_move`.
///
/// The check marker is `Some(side_to_move)` when that side is in check.
pub fn status_for(
    board: &Board,
    side_to_move: Color,
    rights: &CastlingRights,
) -> (Option<Color>, Status) {
    let in_check = is_in_check(board, side_to_move);
    let check = in_check.then_some(side_to_move);

    if has_any_legal_move(board, side_to_move, rights) {
        (check, Status::InProgress)
    } else if in_check {
        (check, Status::Checkmate(side_to_move.other_color()))
    } else {
        (check, Status::Stalemate)
    }
}
