//! Temp-file-and-rename writes.

use std::fs::{self, File};
use std::path::Path;

use tracing::debug;

use crate::error::MappingWriteError;

/// Writes `path` through a uniquely named sibling temp file and renames it
/// into place.
///
/// Readers only ever see the previous complete file or the new complete
/// file. The temp file lives in the target's directory so the rename never
/// crosses a filesystem, and concurrent writers never share a temp file. On
/// error the temp file is removed and the target is left as it was.
pub(crate) fn write_atomically<F>(path: &Path, write: F) -> Result<(), MappingWriteError>
where
    F: FnOnce(&mut File, &Path) -> Result<(), MappingWriteError>,
{
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).map_err(|e| MappingWriteError::CreateDir {
        path: parent.to_path_buf(),
        source: e,
    })?;

    let prefix = format!(
        ".{}.",
        path.file_name()
            .map_or_else(|| "output".into(), |name| name.to_string_lossy())
    );
    let mut temp = tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(|e| MappingWriteError::Write {
            path: parent.to_path_buf(),
            source: e,
        })?;
    let temp_path = temp.path().to_path_buf();

    write(temp.as_file_mut(), &temp_path)?;
    temp.as_file().sync_all().map_err(|e| MappingWriteError::Write {
        path: temp_path.clone(),
        source: e,
    })?;

    // A failed persist hands the temp file back; dropping it deletes it.
    temp.persist(path).map_err(|e| MappingWriteError::Rename {
        temp_path,
        target_path: path.to_path_buf(),
        source: e.error,
    })?;
    sync_directory(parent);
    Ok(())
}

/// Flushes the rename itself to disk. Best effort.
#[cfg(unix)]
fn sync_directory(dir: &Path) {
    if let Err(e) = File::open(dir).and_then(|d| d.sync_all()) {
        debug!(path = %dir.display(), error = %e, "directory sync failed");
    }
}

/// Directories cannot be opened for syncing here.
#[cfg(not(unix))]
fn sync_directory(_dir: &Path) {}
