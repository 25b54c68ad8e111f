//! Error types
//!
//! The simulation itself never fails; errors only surface at the
//! configuration and persistence boundaries.

use thiserror::Error;

/// Result type alias for fallible crate operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Tuning values rejected by validation
    #[error("configuration error: {0}")]
    Config(String),

    /// Best-score or settings backend failure
    #[error("storage error: {0}")]
    Storage(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}
