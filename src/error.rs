//! Error types for the store layer
//!
//! These stay inside the persistence plumbing: store mutation methods
//! recover internally and never surface an error to the caller.

use thiserror::Error;

/// Error type for storage backends and envelope encoding
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type alias for the store layer
pub type Result<T> = std::result::Result<T, StoreError>;
