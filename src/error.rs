//! Centralized error types for the engine.
//!
//! This module defines all error types used throughout the crate,
//! providing a consistent error handling approach.

use bevy_ecs::event::Event;

/// Main error type for the engine.
///
/// This is the primary error type that should be used in public APIs. It is
/// also registered as an event channel so systems can report recoverable
/// faults without aborting the tick.
#[derive(thiserror::Error, Debug, Event)]
pub enum GameError {
    #[error("Board parsing error: {0}")]
    Parse(#[from] ParseError),

    #[error("Map error: {0}")]
    Map(#[from] MapError),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Error type for board parsing operations.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown character in board: {0}")]
    UnknownCharacter(char),
    #[error("Board is empty")]
    EmptyBoard,
    #[error("Board is not rectangular: row {row} has {found} cells, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },
}

/// Errors related to map construction.
#[derive(thiserror::Error, Debug)]
pub enum MapError {
    #[error("Tile not found at {0}")]
    TileNotFound(glam::IVec2),

    #[error("Invalid map configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for engine operations.
pub type GameResult<T> = Result<T, GameError>;
