/// Daemon error types
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DaemonError>;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(#[from] lull_storage::StorageError),

    #[error("Service error: {0}")]
    Service(#[from] lull_service::ServiceError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

