use thiserror::Error;

use crate::Coord;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("Coordinates ({row}, {col}) are outside the board")]
    OutOfRange { row: Coord, col: Coord },
    #[error("Invalid board: {0}")]
    InvalidConstruction(&'static str),
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
}

pub type Result<T> = core::result::Result<T, BoardError>;
