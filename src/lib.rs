pub mod types;
pub mod error;
pub mod board;
pub mod movegen;
pub mod legality;
pub mod history;
pub mod game;
pub mod room;
pub mod perft;
