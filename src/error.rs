use thiserror::Error;

use crate::room::RoomId;
use crate::types::{Color, Position, Status};

/// Why a select or move request was refused. State is never touched when one of these is returned.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum MoveError {
    #[error("no piece of the side to move at {0}")]
    InvalidSelection(Position),
    #[error("illegal move from {from} to {to}")]
    IllegalMove { from: Position, to: Position },
    #[error("game is already over: {0:?}")]
    GameOver(Status),
}

/// A board handed in from outside the engine is unusable.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum SetupError {
    #[error("board has no {} king", .0.to_human())]
    MissingKing(Color),
    #[error("{} is in check but it is not their move", .0.to_human())]
    OpponentInCheck(Color),
    #[error("bad placement string: {0}")]
    BadPlacement(String),
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum RoomError {
    #[error("room {0} is full")]
    Full(RoomId),
    #[error("no room with id {0}")]
    UnknownRoom(RoomId),
    #[error("it is not {}'s turn", .0.to_human())]
    NotYourTurn(Color),
    #[error("nobody is seated as {}", .0.to_human())]
    NotSeated(Color),
    #[error(transparent)]
    Move(#[from] MoveError),
}
