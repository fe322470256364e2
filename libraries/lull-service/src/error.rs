//! Error types for the playback service

use lull_playback::PlaybackError;
use thiserror::Error;

/// Service errors
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The service thread is gone
    #[error("Playback service is not running")]
    Disconnected,

    /// The service thread could not be started
    #[error("Failed to spawn playback thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// The service thread panicked
    #[error("Playback thread panicked")]
    ThreadPanicked,

    /// Error returned by a manager operation run through the service
    #[error(transparent)]
    Playback(#[from] PlaybackError),
}

/// Result type for service operations
pub type Result<T> = std::result::Result<T, ServiceError>;
