/// Core error types for Lull
use thiserror::Error;

/// Result type alias using `LullError`
pub type Result<T> = std::result::Result<T, LullError>;

/// Core error type for Lull
///
/// None of these are fatal to the host: callers reduce each of them to a
/// no-op or a degraded-but-consistent state.
#[derive(Error, Debug)]
pub enum LullError {
    /// The platform refused exclusive audio output
    #[error("Audio focus denied")]
    FocusDenied,

    /// Unrecognized command action
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// Stored preset record could not be decoded
    #[error("Corrupt persisted preset: {0}")]
    CorruptPersistedPreset(String),

    /// Playback engine failure
    #[error("Engine error: {0}")]
    Engine(String),

    /// Storage backend failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl LullError {
    /// Create an engine error
    pub fn engine(msg: impl Into<String>) -> Self {
        Self::Engine(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}
