//! Per-subject conversion errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while converting one subject. None of them abort a batch.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The external converter could not be started.
    #[error("failed to start converter '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The external converter ran and reported failure.
    #[error("converter failed on {recording} ({status}): {message}")]
    Failed {
        recording: PathBuf,
        status: String,
        message: String,
    },

    /// An anatomical or transformation file is missing.
    #[error("missing {kind} file: {path}")]
    MissingAnatomy { kind: &'static str, path: PathBuf },

    /// Output directory could not be created.
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Copying an auxiliary file failed.
    #[error("failed to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for conversion operations.
pub type Result<T> = std::result::Result<T, ConvertError>;
