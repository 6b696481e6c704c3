use serde::{Deserialize, Serialize};

/// Row of white's back rank. Row 0 is black's back rank.
pub const WHITE_HOME_ROW: u8 = 7;
pub const BLACK_HOME_ROW: u8 = 0;

/// Column the king starts on.
pub const KING_HOME_COL: u8 = 4;
pub const QUEENSIDE_ROOK_COL: u8 = 0;
pub const KINGSIDE_ROOK_COL: u8 = 7;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn from_char(c: char) -> Option<Color> {
        match c {
            'w' => Some(Color::White),
            'b' => Some(Color::Black),
            _ => None,
        }
    }

    /// Color of a placement character: uppercase is white, lowercase is black
    pub fn from_case(c: char) -> Option<Color> {
        if c.is_ascii_uppercase() {
            Some(Color::White)
        } else if c.is_ascii_lowercase() {
            Some(Color::Black)
        } else {
            None
        }
    }

    pub fn other_color(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Back rank of this color, where its king and rooks start
    pub fn home_row(&self) -> u8 {
        match self {
            Color::White => WHITE_HOME_ROW,
            Color::Black => BLACK_HOME_ROW,
        }
    }

    /// Row pawns of this color start on
    pub fn pawn_start_row(&self) -> u8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    /// Row delta of a single pawn step
    pub fn pawn_direction(&self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// Row on which a pawn of this color promotes
    pub fn promotion_row(&self) -> u8 {
        self.other_color().home_row()
    }

    pub fn to_human(&self) -> &str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

impl PieceKind {
    pub fn from_char(c: char) -> Option<PieceKind> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'r' => Some(PieceKind::Rook),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }

    pub fn to_human(&self) -> &str {
        match self {
            Self::Pawn => "pawn",
            Self::Rook => "rook",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Queen => "queen",
            Self::King => "king",
        }
    }

    pub fn to_char(&self) -> char {
        match self {
            Self::Pawn => 'P',
            Self::Rook => 'R',
            Self::Knight => 'N',
            Self::Bishop => 'B',
            Self::Queen => 'Q',
            Self::King => 'K',
        }
    }
}

/// A piece carries no position, the board cell holding it is its position.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Self { kind, color }
    }

    /// Parse a placement character such as `K` (white king) or `p` (black pawn)
    pub fn from_char(c: char) -> Option<Piece> {
        Some(Piece {
            kind: PieceKind::from_char(c)?,
            color: Color::from_case(c)?,
        })
    }

    pub fn to_char(&self) -> char {
        let c = self.kind.to_char();
        match self.color {
            Color::White => c,
            Color::Black => c.to_ascii_lowercase(),
        }
    }

    pub fn to_symbol(&self) -> &str {
        match (self.kind, self.color) {
            (PieceKind::Pawn, Color::White) => "♙",
            (PieceKind::Pawn, Color::Black) => "♟︎",
            (PieceKind::Rook, Color::White) => "♖",
            (PieceKind::Rook, Color::Black) => "♜",
            (PieceKind::Knight, Color::White) => "♘",
            (PieceKind::Knight, Color::Black) => "♞",
            (PieceKind::Bishop, Color::White) => "♗",
            (PieceKind::Bishop, Color::Black) => "♝",
            (PieceKind::Queen, Color::White) => "♕",
            (PieceKind::Queen, Color::Black) => "♛",
            (PieceKind::King, Color::White) => "♔",
            (PieceKind::King, Color::Black) => "♚",
        }
    }

    pub fn to_human(&self) -> String {
        format!("{} {}", self.color.to_human(), self.kind.to_human())
    }
}

/// A board coordinate. Row 0 is black's back rank, row 7 is white's.
///
/// Fields are public so collaborators can hand in raw click coordinates;
/// anything outside `[0, 7]` is simply never found on the board.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    pub fn is_on_board(&self) -> bool {
        self.row < 8 && self.col < 8
    }

    /// Step by a signed offset, returning `None` when the result leaves the board
    pub fn offset(&self, d_row: i8, d_col: i8) -> Option<Position> {
        let row = self.row as i8 + d_row;
        let col = self.col as i8 + d_col;
        if (0..8).contains(&row) && (0..8).contains(&col) {
            Some(Position {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

impl CastleSide {
    /// Home column of the rook on this side
    pub fn rook_col(&self) -> u8 {
        match self {
            CastleSide::Kingside => KINGSIDE_ROOK_COL,
            CastleSide::Queenside => QUEENSIDE_ROOK_COL,
        }
    }

    /// Column the king lands on
    pub fn king_target_col(&self) -> u8 {
        match self {
            CastleSide::Kingside => 6,
            CastleSide::Queenside => 2,
        }
    }

    /// Column the king crosses, which is also where the rook lands
    pub fn transit_col(&self) -> u8 {
        match self {
            CastleSide::Kingside => 5,
            CastleSide::Queenside => 3,
        }
    }

    /// Columns strictly between the king and the rook
    pub fn between_cols(&self) -> std::ops::Range<u8> {
        match self {
            CastleSide::Kingside => KING_HOME_COL + 1..KINGSIDE_ROOK_COL,
            CastleSide::Queenside => QUEENSIDE_ROOK_COL + 1..KING_HOME_COL,
        }
    }

    /// The side a `color` king move from its home square castles to, if any
    pub fn from_king_move(color: Color, from: Position, to: Position) -> Option<CastleSide> {
        let home = Position::new(color.home_row(), KING_HOME_COL);
        if from != home || to.row != home.row {
            return None;
        }
        match to.col {
            6 => Some(CastleSide::Kingside),
            2 => Some(CastleSide::Queenside),
            _ => None,
        }
    }

    pub fn from_rook_col(col: u8) -> Option<CastleSide> {
        match col {
            KINGSIDE_ROOK_COL => Some(CastleSide::Kingside),
            QUEENSIDE_ROOK_COL => Some(CastleSide::Queenside),
            _ => None,
        }
    }
}

/// Castling availability for one color
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub struct SideRights {
    pub kingside: bool,
    pub queenside: bool,
}

impl SideRights {
    pub const ALL: SideRights = SideRights {
        kingside: true,
        queenside: true,
    };
    pub const NONE: SideRights = SideRights {
        kingside: false,
        queenside: false,
    };

    pub fn get(&self, side: CastleSide) -> bool {
        match side {
            CastleSide::Kingside => self.kingside,
            CastleSide::Queenside => self.queenside,
        }
    }

    fn revoke(&mut self, side: CastleSide) {
        match side {
            CastleSide::Kingside => self.kingside = false,
            CastleSide::Queenside => self.queenside = false,
        }
    }
}

/// Castling rights for both colors. Every flag only ever goes from `true` to `false`.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub struct CastlingRights {
    pub white: SideRights,
    pub black: SideRights,
    pub white_king_moved: bool,
    pub black_king_moved: bool,
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self::new()
    }
}

impl CastlingRights {
    /// Everything available, as at the start of a game
    pub fn new() -> Self {
        Self {
            white: SideRights::ALL,
            black: SideRights::ALL,
            white_king_moved: false,
            black_king_moved: false,
        }
    }

    /// No castling for anyone
    pub fn none() -> Self {
        Self {
            white: SideRights::NONE,
            black: SideRights::NONE,
            white_king_moved: true,
            black_king_moved: true,
        }
    }

    pub fn for_color(&self, color: Color) -> SideRights {
        match color {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }

    pub fn king_has_moved(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_king_moved,
            Color::Black => self.black_king_moved,
        }
    }

    pub fn revoke(&mut self, color: Color, side: CastleSide) {
        match color {
            Color::White => self.white.revoke(side),
            Color::Black => self.black.revoke(side),
        }
    }

    /// The king moved: both sides are gone for good
    pub fn king_moved(&mut self, color: Color) {
        match color {
            Color::White => self.white_king_moved = true,
            Color::Black => self.black_king_moved = true,
        }
        self.revoke(color, CastleSide::Kingside);
        self.revoke(color, CastleSide::Queenside);
    }
}

/// One entry of the capture ledger
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub struct Capture {
    pub captured_by: Color,
    pub piece: Piece,
}

/// Captures in the order they happened
#[derive(Debug, PartialEq, Eq, Clone, Default, Hash, Serialize, Deserialize)]
pub struct CapturedLedger {
    entries: Vec<Capture>,
}

impl CapturedLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, captured_by: Color, piece: Piece) {
        self.entries.push(Capture { captured_by, piece });
    }

    pub fn entries(&self) -> &[Capture] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pieces taken by `color`, in capture order
    pub fn captured_by(&self, color: Color) -> impl Iterator<Item = Piece> + '_ {
        self.entries
            .iter()
            .filter(move |c| c.captured_by == color)
            .map(|c| c.piece)
    }
}

/// Whether the game can continue
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum Status {
    InProgress,
    /// Contains the winning color
    Checkmate(Color),
    Stalemate,
}

impl Status {
    pub fn is_over(&self) -> bool {
        !matches!(self, Status::InProgress)
    }
}

/// Result of a successfully applied move
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Ok,
    /// Contains the winning color
    Checkmate(Color),
    Stalemate,
}

impl From<Status> for Outcome {
    fn from(status: Status) -> Self {
        match status {
            Status::InProgress => Outcome::Ok,
            Status::Checkmate(winner) => Outcome::Checkmate(winner),
            Status::Stalemate => Outcome::Stalemate,
        }
    }
}
