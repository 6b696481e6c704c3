//! Turn order, castling rights, promotion, capture bookkeeping and undo.
//!
//! The free functions are stateless: they take the current records and hand back new
//! ones, so one host can run any number of games side by side. [`Game`] wraps them for
//! a single session and adds the selection step a board front end needs.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::error::{MoveError, SetupError};
use crate::history::{History, Snapshot};
use crate::legality::{is_in_check, legal_moves, status_for};
use crate::types::{
    CapturedLedger, CastleSide, CastlingRights, Color, Outcome, Piece, PieceKind, Position, Status,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameState {
    pub board: Board,
    pub side_to_move: Color,
    /// Who, if anyone, is in check right now
    pub check: Option<Color>,
}

/// The records produced by a successful move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResult {
    pub state: GameState,
    pub rights: CastlingRights,
    pub ledger: CapturedLedger,
    pub outcome: Outcome,
}

/// Standard initial position, white to move, nobody in check
pub fn new_game() -> GameState {
    GameState {
        board: Board::new(),
        side_to_move: Color::White,
        check: None,
    }
}

pub fn selectable_piece_at(board: &Board, pos: Position, side_to_move: Color) -> bool {
    board
        .piece_at(pos)
        .is_some_and(|piece| piece.color == side_to_move)
}

pub fn legal_destinations(board: &Board, pos: Position, rights: &CastlingRights) -> Vec<Position> {
    legal_moves(board, pos, rights)
}

/// Validate and play `from -> to` for the side to move.
///
/// On rejection nothing is returned but the error; the inputs are never modified.
pub fn apply_move(
    state: &GameState,
    rights: &CastlingRights,
    ledger: &CapturedLedger,
    from: Position,
    to: Position,
) -> Result<MoveResult, MoveError> {
    let illegal = MoveError::IllegalMove { from, to };

    let mover = match state.board.piece_at(from) {
        Some(piece) if piece.color == state.side_to_move => piece,
        _ => return Err(illegal),
    };
    if !legal_moves(&state.board, from, rights).contains(&to) {
        return Err(illegal);
    }

    let (board, captured) = state.board.execute_move(from, to);

    let mut ledger = ledger.clone();
    if let Some(piece) = captured {
        ledger.record(mover.color, piece);
    }

    let mut rights = *rights;
    update_rights(&mut rights, mover, from, to, captured);

    let side_to_move = mover.color.other_color();
    let (check, status) = status_for(&board, side_to_move, &rights);

    Ok(MoveResult {
        state: GameState {
            board,
            side_to_move,
            check,
        },
        rights,
        ledger,
        outcome: status.into(),
    })
}

/// King moves drop both sides, a rook leaving its home corner drops its side, and a
/// rook taken on its home corner drops the owner's side.
fn update_rights(
    rights: &mut CastlingRights,
    mover: Piece,
    from: Position,
    to: Position,
    captured: Option<Piece>,
) {
    match mover.kind {
        PieceKind::King => rights.king_moved(mover.color),
        PieceKind::Rook => {
            if from.row == mover.color.home_row() {
                if let Some(side) = CastleSide::from_rook_col(from.col) {
                    rights.revoke(mover.color, side);
                }
            }
        }
        PieceKind::Pawn | PieceKind::Knight | PieceKind::Bishop | PieceKind::Queen => {}
    }

    if let Some(taken) = captured {
        if taken.kind == PieceKind::Rook && to.row == taken.color.home_row() {
            if let Some(side) = CastleSide::from_rook_col(to.col) {
                rights.revoke(taken.color, side);
            }
        }
    }
}

/// Pop the latest snapshot, if there is one
pub fn undo(history: &mut History) -> Option<Snapshot> {
    history.pop()
}

/// Where a session stands between calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase<'a> {
    AwaitingSelection,
    PieceSelected {
        from: Position,
        destinations: &'a [Position],
    },
    Checkmate(Color),
    Stalemate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub from: Position,
    pub destinations: Vec<Position>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoResult {
    Restored,
    NothingToUndo,
}

/// What a single square click turned into
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickResult {
    Moved(Outcome),
    Selected(Vec<Position>),
    Deselected,
    /// Nothing was selected and the square holds nothing selectable, or the game is over
    Ignored,
}

/// One game session: the current records, the undo stack and the pending selection.
#[derive(Debug, Clone)]
pub struct Game {
    state: GameState,
    rights: CastlingRights,
    ledger: CapturedLedger,
    history: History,
    selection: Option<Selection>,
    status: Status,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    pub fn new() -> Self {
        Self {
            state: new_game(),
            rights: CastlingRights::new(),
            ledger: CapturedLedger::new(),
            history: History::new(),
            selection: None,
            status: Status::InProgress,
        }
    }

    /// Start from an injected position. Both kings must be on the board and the side
    /// that just moved may not be left in check.
    pub fn from_board(
        board: Board,
        side_to_move: Color,
        rights: CastlingRights,
    ) -> Result<Self, SetupError> {
        board.validate()?;
        let waiting = side_to_move.other_color();
        if is_in_check(&board, waiting) {
            log::warn!("rejecting board where {} is in check out of turn", waiting.to_human());
            return Err(SetupError::OpponentInCheck(waiting));
        }
        let (check, status) = status_for(&board, side_to_move, &rights);
        Ok(Self {
            state: GameState {
                board,
                side_to_move,
                check,
            },
            rights,
            ledger: CapturedLedger::new(),
            history: History::new(),
            selection: None,
            status,
        })
    }

    /// Throw everything away and set up the initial position
    pub fn new_game(&mut self) {
        log::info!("starting a new game");
        *self = Game::new();
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn board(&self) -> &Board {
        &self.state.board
    }

    pub fn side_to_move(&self) -> Color {
        self.state.side_to_move
    }

    pub fn check(&self) -> Option<Color> {
        self.state.check
    }

    pub fn rights(&self) -> &CastlingRights {
        &self.rights
    }

    pub fn ledger(&self) -> &CapturedLedger {
        &self.ledger
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn phase(&self) -> Phase<'_> {
        match (self.status, &self.selection) {
            (Status::Checkmate(winner), _) => Phase::Checkmate(winner),
            (Status::Stalemate, _) => Phase::Stalemate,
            (Status::InProgress, Some(sel)) => Phase::PieceSelected {
                from: sel.from,
                destinations: &sel.destinations,
            },
            (Status::InProgress, None) => Phase::AwaitingSelection,
        }
    }

    /// Current records, as they would be pushed onto the undo stack
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state,
            rights: self.rights,
            ledger: self.ledger.clone(),
        }
    }

    pub fn legal_destinations(&self, pos: Position) -> Vec<Position> {
        legal_destinations(&self.state.board, pos, &self.rights)
    }

    /// Select a piece of the side to move.
    ///
    /// Returns its legal destinations, or `None` when `pos` was already selected and the
    /// selection was toggled off. A refused selection leaves the previous one in place.
    pub fn select(&mut self, pos: Position) -> Result<Option<&[Position]>, MoveError> {
        if self.status.is_over() {
            return Err(MoveError::GameOver(self.status));
        }
        if self.selection.as_ref().is_some_and(|sel| sel.from == pos) {
            log::debug!("deselecting {pos}");
            self.selection = None;
            return Ok(None);
        }
        if !selectable_piece_at(&self.state.board, pos, self.state.side_to_move) {
            log::debug!("refusing selection of {pos}");
            return Err(MoveError::InvalidSelection(pos));
        }

        let destinations = self.legal_destinations(pos);
        log::debug!("selected {pos} with {} destinations", destinations.len());
        let sel = self.selection.insert(Selection {
            from: pos,
            destinations,
        });
        Ok(Some(sel.destinations.as_slice()))
    }

    pub fn deselect(&mut self) {
        self.selection = None;
    }

    /// Play `from -> to`. On success the pre-move records go onto the undo stack.
    pub fn apply_move(&mut self, from: Position, to: Position) -> Result<Outcome, MoveError> {
        if self.status.is_over() {
            return Err(MoveError::GameOver(self.status));
        }

        let result = apply_move(&self.state, &self.rights, &self.ledger, from, to).map_err(|e| {
            log::debug!("rejected move: {e}");
            e
        })?;

        let snapshot = self.snapshot();
        self.history.push(snapshot);
        log::debug!(
            "{} played {from} -> {to}",
            self.state.side_to_move.to_human()
        );

        self.state = result.state;
        self.rights = result.rights;
        self.ledger = result.ledger;
        self.selection = None;
        self.status = match result.outcome {
            Outcome::Ok => Status::InProgress,
            Outcome::Checkmate(winner) => {
                log::info!("checkmate, {} wins", winner.to_human());
                Status::Checkmate(winner)
            }
            Outcome::Stalemate => {
                log::info!("stalemate");
                Status::Stalemate
            }
        };
        Ok(result.outcome)
    }

    /// Route a click the way a board front end would: move if a selected piece can go
    /// there, otherwise select an own piece, otherwise clear the selection.
    pub fn click(&mut self, pos: Position) -> ClickResult {
        if self.status.is_over() {
            return ClickResult::Ignored;
        }

        if let Some(sel) = &self.selection {
            if sel.destinations.contains(&pos) {
                let from = sel.from;
                return match self.apply_move(from, pos) {
                    Ok(outcome) => ClickResult::Moved(outcome),
                    // destinations were computed against this very state
                    Err(_) => ClickResult::Ignored,
                };
            }
        }

        if selectable_piece_at(&self.state.board, pos, self.state.side_to_move) {
            let destinations = self.legal_destinations(pos);
            self.selection = Some(Selection {
                from: pos,
                destinations: destinations.clone(),
            });
            ClickResult::Selected(destinations)
        } else if self.selection.take().is_some() {
            ClickResult::Deselected
        } else {
            ClickResult::Ignored
        }
    }

    /// Restore the records from before the last move. Undo itself is not undoable.
    pub fn undo(&mut self) -> UndoResult {
        match undo(&mut self.history) {
            Some(snapshot) => {
                log::info!("undoing last move, {} left", self.history.len());
                self.restore(snapshot);
                UndoResult::Restored
            }
            None => {
                log::debug!("nothing to undo");
                UndoResult::NothingToUndo
            }
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.state = snapshot.state;
        self.rights = snapshot.rights;
        self.ledger = snapshot.ledger;
        self.selection = None;
        self.status = status_for(&self.state.board, self.state.side_to_move, &self.rights).1;
    }
}
