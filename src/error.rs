//! Centralized error types for the simulation core.
//!
//! This module defines all error types used throughout the crate,
//! providing a consistent error handling approach.

/// Main error type for the simulation core.
///
/// This is the primary error type that should be used in public APIs.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Board parsing error: {0}")]
    BoardParse(#[from] ParseError),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Error type for board layout parsing.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown character in board: {0}")]
    UnknownCharacter(char),

    #[error("Board must have {expected} rows, found {found}")]
    InvalidRowCount { expected: usize, found: usize },

    #[error("Board row {row} must be {expected} tiles wide, found {found}")]
    InvalidRowLength {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("House door must have exactly 2 cells, found {0}")]
    InvalidDoorCount(usize),
}

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;
