//! Pseudo-legal move generation.
//!
//! A pseudo-legal move obeys the piece's movement pattern and board occupancy,
//! stays on the board and does not jump over pieces, but may leave the mover's own
//! king attacked. Filtering those out is the job of [`crate::legality`].

use crate::board::Board;
use crate::types::{
    CastleSide, CastlingRights, Color, Piece, PieceKind, Position, SideRights, KING_HOME_COL,
};

pub const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
pub const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
pub const QUEEN_DIRECTIONS: [(i8, i8); 8] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-1, -2),
    (-2, 1),
    (-1, 2),
    (2, -1),
    (1, -2),
    (2, 1),
    (1, 2),
];

pub const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// What a piece finds on a target square
enum PotentialMove {
    /// Empty square, keep sliding
    Quiet,
    /// Enemy piece, stop after this square
    Capture,
    /// Own piece, stop before this square
    Blocked,
}

impl PotentialMove {
    fn is_valid(&self) -> bool {
        !matches!(self, PotentialMove::Blocked)
    }

    fn continue_search_in_direction(&self) -> bool {
        matches!(self, PotentialMove::Quiet)
    }
}

fn check_move_target(board: &Board, color: Color, candidate: Position) -> PotentialMove {
    match board.piece_at(candidate) {
        Some(other) if other.color == color => PotentialMove::Blocked,
        Some(_) => PotentialMove::Capture,
        None => PotentialMove::Quiet,
    }
}

/// Pseudo-legal destinations of whatever stands on `pos`.
///
/// Querying an empty square is a valid no-op and yields no moves.
pub fn pseudo_moves(board: &Board, pos: Position, rights: &CastlingRights) -> Vec<Position> {
    match board.piece_at(pos) {
        Some(piece) => pseudo_moves_with(
            board,
            pos,
            rights.for_color(piece.color),
            rights.king_has_moved(piece.color),
        ),
        None => vec![],
    }
}

/// Same as [`pseudo_moves`] but with the mover's castling state passed in directly
pub fn pseudo_moves_with(
    board: &Board,
    pos: Position,
    side_rights: SideRights,
    king_has_moved: bool,
) -> Vec<Position> {
    let Some(piece) = board.piece_at(pos) else {
        return vec![];
    };

    match piece.kind {
        PieceKind::Pawn => pawn_moves(board, pos, piece.color),
        PieceKind::Rook => sliding_moves(board, pos, piece.color, &ROOK_DIRECTIONS),
        PieceKind::Bishop => sliding_moves(board, pos, piece.color, &BISHOP_DIRECTIONS),
        PieceKind::Queen => sliding_moves(board, pos, piece.color, &QUEEN_DIRECTIONS),
        PieceKind::Knight => step_moves(board, pos, piece.color, &KNIGHT_OFFSETS),
        PieceKind::King => {
            let mut moves = step_moves(board, pos, piece.color, &KING_OFFSETS);
            moves.extend(castle_moves(board, pos, piece, side_rights, king_has_moved));
            moves
        }
    }
}

/// Forward pushes onto empty squares, diagonal steps only onto enemy pieces.
///
/// No en passant.
fn pawn_moves(board: &Board, pos: Position, color: Color) -> Vec<Position> {
    let mut moves = vec![];
    let direction = color.pawn_direction();

    if let Some(one_step) = pos.offset(direction, 0) {
        if board.is_empty_at(one_step) {
            moves.push(one_step);

            if pos.row == color.pawn_start_row() {
                if let Some(two_step) = pos.offset(2 * direction, 0) {
                    if board.is_empty_at(two_step) {
                        moves.push(two_step);
                    }
                }
            }
        }
    }

    for d_col in [-1, 1] {
        if let Some(target) = pos.offset(direction, d_col) {
            if let PotentialMove::Capture = check_move_target(board, color, target) {
                moves.push(target);
            }
        }
    }
    moves
}

fn sliding_moves(
    board: &Board,
    pos: Position,
    color: Color,
    directions: &[(i8, i8)],
) -> Vec<Position> {
    let mut moves = vec![];

    for &(d_row, d_col) in directions {
        let mut current = pos;
        while let Some(candidate) = current.offset(d_row, d_col) {
            let potential_move = check_move_target(board, color, candidate);
            if potential_move.is_valid() {
                moves.push(candidate);
            }
            if !potential_move.continue_search_in_direction() {
                break;
            }
            current = candidate;
        }
    }
    moves
}

/// Single-step movers: knight and the king's ordinary moves
fn step_moves(board: &Board, pos: Position, color: Color, offsets: &[(i8, i8)]) -> Vec<Position> {
    offsets
        .iter()
        .filter_map(|&(d_row, d_col)| pos.offset(d_row, d_col))
        .filter(|&target| check_move_target(board, color, target).is_valid())
        .collect()
}

/// Two-file king moves. Only occupancy and rights are checked here; whether the king
/// passes through an attacked square is decided by the legality filter.
fn castle_moves(
    board: &Board,
    pos: Position,
    king: Piece,
    side_rights: SideRights,
    king_has_moved: bool,
) -> Vec<Position> {
    let home_row = king.color.home_row();
    if king_has_moved || pos != Position::new(home_row, KING_HOME_COL) {
        return vec![];
    }

    [CastleSide::Kingside, CastleSide::Queenside]
        .into_iter()
        .filter(|&side| side_rights.get(side))
        .filter(|side| {
            side.between_cols()
                .all(|col| board.is_empty_at(Position::new(home_row, col)))
        })
        .filter(|side| {
            board.piece_at(Position::new(home_row, side.rook_col()))
                == Some(Piece::new(PieceKind::Rook, king.color))
        })
        .map(|side| Position::new(home_row, side.king_target_col()))
        .collect()
}
