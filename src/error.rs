//! Error types for the grid duel engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DuelError {
    #[error("Position ({x}, {y}) is outside the board")]
    OutOfBounds { x: i32, y: i32 },

    #[error("Tile ({x}, {y}) is already occupied")]
    TileOccupied { x: i32, y: i32 },

    #[error("Entity not found: {0}")]
    EntityNotFound(u32),

    #[error("Invalid hand position: {0}")]
    InvalidHandPosition(usize),

    #[error("Invalid game action: {0}")]
    InvalidAction(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DuelError>;
