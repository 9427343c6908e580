//! Storage error types

use crate::listing::ListingId;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during cache operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("No cached document for listing {0}")]
    NotFound(ListingId),

    #[error("Cache entry should be a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Unexpected entry in cache directory: {0}")]
    InvalidEntry(String),

    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl StorageError {
    /// Returns true if the error reports a missing document
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
