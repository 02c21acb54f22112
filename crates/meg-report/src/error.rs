//! Output error types.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to persist the subject mapping. Fatal for the run.
#[derive(Debug, Error)]
pub enum MappingWriteError {
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode mapping {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Temp file could not be moved over the target.
    #[error("failed to replace {target_path} with {temp_path}: {source}")]
    Rename {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure to read an existing mapping file.
#[derive(Debug, Error)]
#[error("failed to read mapping {path}: {source}")]
pub struct MappingReadError {
    pub path: PathBuf,
    #[source]
    pub source: csv::Error,
}

/// Failure to flush the processing log.
#[derive(Debug, Error)]
#[error("failed to write processing log {path}: {source}")]
pub struct LogWriteError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}
