use std::fmt;

use itertools::iproduct;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::SetupError;
use crate::types::{CastleSide, Color, Piece, PieceKind, Position};

/// Board field of the standard starting FEN
pub const STARTING_PLACEMENT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

static STARTING_BOARD: Lazy<Board> = Lazy::new(|| {
    let mut board = Board::empty();
    for (col, kind) in BACK_RANK.iter().enumerate() {
        let col = col as u8;
        for color in [Color::White, Color::Black] {
            let pawn_row = color.pawn_start_row();
            board.set(Position::new(color.home_row(), col), Some(Piece::new(*kind, color)));
            board.set(Position::new(pawn_row, col), Some(Piece::new(PieceKind::Pawn, color)));
        }
    }
    board
});

/// 8x8 grid, row-major. Row 0 is black's back rank, row 7 is white's.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Standard initial position
    pub fn new() -> Board {
        *STARTING_BOARD
    }

    pub fn empty() -> Board {
        Board {
            squares: [[None; 8]; 8],
        }
    }

    /// Wrap a raw grid handed in by a collaborator. Kings are checked, nothing else is.
    pub fn from_squares(squares: [[Option<Piece>; 8]; 8]) -> Result<Board, SetupError> {
        let board = Board { squares };
        board.validate()?;
        Ok(board)
    }

    /// Build a board from the placement field of a FEN record, e.g.
    /// `"4k3/8/8/8/8/8/8/4K3"`. The first rank listed is row 0.
    ///
    /// Boards without a king are accepted here; use [`Board::validate`] to reject them.
    pub fn from_placement(placement: &str) -> Result<Board, SetupError> {
        let mut board = Board::empty();
        let ranks: Vec<&str> = placement.trim().split('/').collect();
        if ranks.len() != 8 {
            return Err(SetupError::BadPlacement(format!(
                "expected 8 ranks, found {}",
                ranks.len()
            )));
        }

        for (row, rank) in ranks.iter().enumerate() {
            let mut col: u8 = 0;
            for c in rank.chars() {
                if let Some(skip) = c.to_digit(10) {
                    col = col.saturating_add(skip as u8);
                } else {
                    let piece = Piece::from_char(c).ok_or_else(|| {
                        SetupError::BadPlacement(format!("unexpected char `{c}` in rank {row}"))
                    })?;
                    if col >= 8 {
                        return Err(SetupError::BadPlacement(format!("rank {row} is too long")));
                    }
                    board.squares[row][col as usize] = Some(piece);
                    col += 1;
                }
            }
            if col != 8 {
                return Err(SetupError::BadPlacement(format!(
                    "rank {row} covers {col} squares"
                )));
            }
        }
        Ok(board)
    }

    /// The piece on `pos`, or `None` for an empty or off-board square
    pub fn piece_at(&self, pos: Position) -> Option<Piece> {
        if !pos.is_on_board() {
            return None;
        }
        self.squares[pos.row as usize][pos.col as usize]
    }

    pub fn is_empty_at(&self, pos: Position) -> bool {
        self.piece_at(pos).is_none()
    }

    /// Overwrite a square. Off-board positions are ignored.
    pub fn set(&mut self, pos: Position, square: Option<Piece>) {
        if pos.is_on_board() {
            self.squares[pos.row as usize][pos.col as usize] = square;
        }
    }

    /// All 64 positions, row by row
    pub fn positions() -> impl Iterator<Item = Position> {
        iproduct!(0..8u8, 0..8u8).map(|(row, col)| Position::new(row, col))
    }

    /// Occupied squares of `color`, row by row
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Position, Piece)> + '_ {
        Board::positions().filter_map(move |pos| {
            self.piece_at(pos)
                .filter(|p| p.color == color)
                .map(|p| (pos, p))
        })
    }

    pub fn find_king(&self, color: Color) -> Option<Position> {
        self.pieces(color)
            .find(|(_, p)| p.kind == PieceKind::King)
            .map(|(pos, _)| pos)
    }

    /// Both kings must be present
    pub fn validate(&self) -> Result<(), SetupError> {
        for color in [Color::White, Color::Black] {
            if self.find_king(color).is_none() {
                log::warn!("rejecting board without a {} king", color.to_human());
                return Err(SetupError::MissingKing(color));
            }
        }
        Ok(())
    }

    /// Return the board after moving the piece on `from` to `to`, together with the
    /// piece that stood on `to`.
    ///
    /// A king moving two files from its home square also brings the rook across, and a
    /// pawn reaching the far back rank becomes a queen. No legality is checked here.
    pub fn execute_move(&self, from: Position, to: Position) -> (Board, Option<Piece>) {
        let mut board = *self;
        let Some(piece) = self.piece_at(from) else {
            return (board, None);
        };
        let captured = self.piece_at(to);

        board.set(from, None);
        board.set(to, Some(piece));

        match piece.kind {
            PieceKind::King => {
                if let Some(side) = CastleSide::from_king_move(piece.color, from, to) {
                    let rook_from = Position::new(from.row, side.rook_col());
                    let rook_to = Position::new(from.row, side.transit_col());
                    board.set(rook_to, board.piece_at(rook_from));
                    board.set(rook_from, None);
                }
            }
            PieceKind::Pawn => {
                if to.row == piece.color.promotion_row() {
                    board.set(to, Some(Piece::new(PieceKind::Queen, piece.color)));
                }
            }
            PieceKind::Rook | PieceKind::Knight | PieceKind::Bishop | PieceKind::Queen => {}
        }

        (board, captured)
    }

    pub fn draw_board(&self) -> String {
        let mut string = String::new();

        for row in 0..8 {
            for col in 0..8 {
                let p = self.piece_at(Position::new(row, col));
                string.push(' ');
                string.push_str(match &p {
                    Some(pp) => pp.to_symbol(),
                    None => ".",
                });
            }
            string.push('\n');
        }
        string
    }

    pub fn draw_to_terminal(&self) {
        println!("{}", self.draw_board());
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.draw_board())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn build_starting_board() {
        let b = Board::new();

        assert_eq!(b.pieces(Color::White).count(), 16);
        assert_eq!(b.pieces(Color::Black).count(), 16);

        // count pawns
        let pawns = Board::positions()
            .filter_map(|pos| b.piece_at(pos))
            .filter(|p| p.kind == PieceKind::Pawn)
            .count();
        assert_eq!(pawns, 16);

        assert_eq!(b.find_king(Color::White), Some(Position::new(7, 4)));
        assert_eq!(b.find_king(Color::Black), Some(Position::new(0, 4)));
        assert_eq!(
            b.piece_at(Position::new(0, 3)),
            Some(Piece::new(PieceKind::Queen, Color::Black))
        );
        assert_eq!(
            b.piece_at(Position::new(7, 0)),
            Some(Piece::new(PieceKind::Rook, Color::White))
        );
        for row in 2..6 {
            for col in 0..8 {
                assert!(b.is_empty_at(Position::new(row, col)));
            }
        }
    }

    #[test]
    fn starting_placement_matches_new() {
        assert_eq!(Board::from_placement(STARTING_PLACEMENT).unwrap(), Board::new());
    }

    #[test]
    fn off_board_reads_are_empty() {
        let b = Board::new();
        assert_eq!(b.piece_at(Position::new(8, 0)), None);
        assert_eq!(b.piece_at(Position::new(0, 200)), None);
    }

    #[test]
    fn bad_placements_are_rejected() {
        assert!(matches!(
            Board::from_placement("8/8/8"),
            Err(SetupError::BadPlacement(_))
        ));
        assert!(matches!(
            Board::from_placement("9/8/8/8/8/8/8/8"),
            Err(SetupError::BadPlacement(_))
        ));
        assert!(matches!(
            Board::from_placement("4x3/8/8/8/8/8/8/8"),
            Err(SetupError::BadPlacement(_))
        ));
    }

    #[test]
    fn missing_king_is_detected() {
        let b = Board::from_placement("8/8/8/8/8/8/8/4K3").unwrap();
        assert_eq!(b.validate(), Err(SetupError::MissingKing(Color::Black)));
        let mut squares = [[None; 8]; 8];
        squares[0][0] = Some(Piece::new(PieceKind::King, Color::Black));
        assert_eq!(
            Board::from_squares(squares),
            Err(SetupError::MissingKing(Color::White))
        );
    }

    #[test]
    fn execute_castle_moves_the_rook() {
        // . . . . ♚ . . .
        // ...
        // ♖ . . . ♔ . . ♖
        let b = Board::from_placement("4k3/8/8/8/8/8/8/R3K2R").unwrap();
        let (after, captured) = b.execute_move(Position::new(7, 4), Position::new(7, 6));
        assert_eq!(captured, None);
        assert_eq!(
            after.piece_at(Position::new(7, 5)),
            Some(Piece::new(PieceKind::Rook, Color::White))
        );
        assert!(after.is_empty_at(Position::new(7, 7)));
        assert!(after.is_empty_at(Position::new(7, 4)));

        let (after, _) = b.execute_move(Position::new(7, 4), Position::new(7, 2));
        assert_eq!(
            after.piece_at(Position::new(7, 3)),
            Some(Piece::new(PieceKind::Rook, Color::White))
        );
        assert!(after.is_empty_at(Position::new(7, 0)));
    }

    #[test]
    fn execute_promotes_pawns_to_queens() {
        let b = Board::from_placement("1n2k3/P7/8/8/8/8/7p/4K3").unwrap();
        let (after, captured) = b.execute_move(Position::new(1, 0), Position::new(0, 1));
        assert_eq!(captured, Some(Piece::new(PieceKind::Knight, Color::Black)));
        assert_eq!(
            after.piece_at(Position::new(0, 1)),
            Some(Piece::new(PieceKind::Queen, Color::White))
        );

        let (after, _) = b.execute_move(Position::new(6, 7), Position::new(7, 7));
        assert_eq!(
            after.piece_at(Position::new(7, 7)),
            Some(Piece::new(PieceKind::Queen, Color::Black))
        );
    }

    #[test]
    fn draw_has_eight_rows() {
        let drawn = Board::new().draw_board();
        assert_eq!(drawn.lines().count(), 8);
        assert!(drawn.starts_with(" ♜ ♞ ♝ ♛ ♚ ♝ ♞ ♜"));
    }
}
