//! # Store Errors
//!
//! Error types for the document store.

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Document store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying file I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A collection file did not hold a JSON array of objects
    #[error("Corrupt collection file {path}: {message}")]
    Corrupt { path: String, message: String },

    /// JSON (de)serialization failed
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// A reader/writer lock was poisoned by a panicking thread
    #[error("Store lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    pub fn corrupt(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Corrupt {
            path: path.into(),
            message: message.into(),
        }
    }
}
