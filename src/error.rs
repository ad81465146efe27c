use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while fetching the photo list
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to read photo assets: {0}")]
    Io(#[from] std::io::Error),

    #[error("No photo assets found in {}", .0.display())]
    NoAssets(PathBuf),

    #[error("Fetch task was dropped before completing")]
    Cancelled,
}

/// Errors that can occur while reading or writing the persistence slot
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to serialize canvas photos: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to access state file: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Errors that can occur while loading the editor configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
}
