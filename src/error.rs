//! Error types for the snapshot engine.

use crate::types::CommitID;
use thiserror::Error;

/// Storage-related errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Commit already exists: {0}")]
    CommitExists(CommitID),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors surfaced by repository operations
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Nothing to commit: no readable files were given")]
    NothingToCommit,

    #[error("Commit not found: {0}. Use the full commit ID shown by `mvcs history`.")]
    CommitNotFound(String),

    #[error("File {filename} is not part of commit {commit_id}")]
    FileNotInCommit { commit_id: String, filename: String },

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
