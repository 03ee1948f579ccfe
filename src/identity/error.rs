//! Identity store error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur reading or writing the local key-value store
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The store file exists but is not a JSON object of strings
    #[error("Corrupt store {path:?}: {error}")]
    Corrupt { path: PathBuf, error: String },
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
