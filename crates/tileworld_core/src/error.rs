//! Error type for map mutation and persistence

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the tile map and its persistence layer
#[derive(Debug, Error)]
pub enum MapError {
    /// A tile tag outside the recognized category set was rejected before
    /// any state was mutated
    #[error("unrecognized tile type `{0}`")]
    InvalidTile(String),
    /// The map file does not exist; callers may fall back to an empty map
    #[error("map file not found: {0}")]
    NotFound(PathBuf),
    /// The map file exists but does not match the expected schema
    #[error("corrupt map data: {0}")]
    CorruptData(String),
    /// Underlying filesystem failure on save or load
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
