//! Error types for playback management

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// No saved preset with this id
    #[error("Preset not found: {0}")]
    PresetNotFound(String),

    /// Sound key missing from the catalog
    #[error("Unknown sound: {0}")]
    UnknownSound(String),

    /// Random mix request cannot be satisfied
    #[error("Catalog has {available} sound(s) for {tag}, need at least {required}")]
    InsufficientCatalog {
        tag: String,
        required: usize,
        available: usize,
    },

    /// Invalid operation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Engine error
    #[error(transparent)]
    Engine(#[from] lull_core::LullError),

    /// Preset persistence error
    #[error(transparent)]
    Storage(#[from] lull_storage::StorageError),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
