//! Checkpoint traits and error types

use crate::model::CrawlResult;
use thiserror::Error;

/// Errors that can occur while writing or copying snapshots
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to replace snapshot {path}: {source}")]
    Persist {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid snapshot path: {0}")]
    InvalidPath(String),
}

/// Result type for checkpoint operations
pub type CheckpointResult<T> = Result<T, CheckpointError>;

/// Durable home for the latest `CrawlResult` snapshot
///
/// Each call replaces the previous snapshot as a whole; readers must never
/// see a partially written one.
pub trait CheckpointStore {
    /// Overwrites the stored snapshot with `result`
    fn persist(&mut self, result: &CrawlResult) -> CheckpointResult<()>;
}
