//! Error types for recording discovery.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort discovery before any subject is processed.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Search root missing or not a directory.
    #[error("search root not found: {path}")]
    RootNotFound { path: PathBuf },

    /// Failed to read the search root.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Name-matching pattern could not be compiled.
    #[error("invalid name pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Naming rule is misconfigured.
    #[error("invalid naming rule: {reason}")]
    InvalidRule { reason: String },
}

/// Result type for discovery operations.
pub type Result<T> = std::result::Result<T, IngestError>;
