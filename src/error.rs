//! Error types for the hexgit engine

use thiserror::Error;

/// Errors for genuinely exceptional conditions.
///
/// History/combat edge cases (branch cap, merge at generation 0, friendly
/// fire, ...) are not errors - they are rejection variants on the outcome
/// enums of the operations that produce them.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Cell ({x}, {y}) is outside the board bounds")]
    OutOfBounds { x: usize, y: usize },

    #[error("Invalid board dimensions: {0}x{1}")]
    InvalidDimensions(usize, usize),

    #[error("Unknown unit: {0}")]
    UnknownUnit(String),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
