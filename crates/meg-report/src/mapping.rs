//! Subject name to numeric ID mapping file.

use std::path::Path;

use meg_model::SubjectMappingEntry;
use tracing::info;

use crate::atomic::write_atomically;
use crate::error::{MappingReadError, MappingWriteError};

/// Column names of the mapping file.
pub const MAPPING_HEADER: [&str; 2] = ["Subject", "Number"];

/// Writes one `Subject,Number` row per entry, replacing `path` atomically.
///
/// The header is always written, so an empty run still yields a valid file.
/// Output depends only on `entries`, which makes reruns byte-identical.
pub fn write_mapping(
    entries: &[SubjectMappingEntry],
    path: &Path,
) -> Result<(), MappingWriteError> {
    write_atomically(path, |file, temp_path| {
        let csv_error = |source| MappingWriteError::Csv {
            path: temp_path.to_path_buf(),
            source,
        };
        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(MAPPING_HEADER).map_err(csv_error)?;
        for entry in entries {
            writer
                .write_record([entry.subject.as_str(), entry.number.to_string().as_str()])
                .map_err(csv_error)?;
        }
        writer.flush().map_err(|e| MappingWriteError::Write {
            path: temp_path.to_path_buf(),
            source: e,
        })
    })?;

    info!(path = %path.display(), rows = entries.len(), "wrote subject mapping");
    Ok(())
}

/// Reads a mapping file written by [`write_mapping`].
pub fn read_mapping(path: &Path) -> Result<Vec<SubjectMappingEntry>, MappingReadError> {
    let read_error = |source| MappingReadError {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::Reader::from_path(path).map_err(read_error)?;
    reader
        .deserialize::<SubjectMappingEntry>()
        .map(|row| row.map_err(read_error))
        .collect()
}
