//! Processing log file.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use meg_model::{LogLevel, ProcessingLog};

use crate::error::LogWriteError;

/// How the log file is opened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogWriteMode {
    /// Keep earlier runs and add this one at the end.
    #[default]
    Append,
    /// Replace the file with this run only.
    Overwrite,
}

/// Renders a run as `LEVEL - message` lines framed by start and summary lines.
pub fn render_processing_log(log: &ProcessingLog, started_at: DateTime<Utc>) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} - run started {}\n",
        LogLevel::Info,
        started_at.to_rfc3339()
    ));
    for line in log.lines() {
        out.push_str(&line);
        out.push('\n');
    }
    let subjects = log.len() - log.warning_count();
    out.push_str(&format!(
        "{} - run finished: {subjects} subjects, {} failed, {} warnings\n",
        LogLevel::Info,
        log.failure_count(),
        log.warning_count()
    ));
    out
}

pub fn write_processing_log(
    log: &ProcessingLog,
    path: &Path,
    mode: LogWriteMode,
    started_at: DateTime<Utc>,
) -> Result<(), LogWriteError> {
    let write_error = |source| LogWriteError {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }
    let mut options = OpenOptions::new();
    options.create(true);
    match mode {
        LogWriteMode::Append => options.append(true),
        LogWriteMode::Overwrite => options.write(true).truncate(true),
    };
    let mut file = options.open(path).map_err(write_error)?;
    file.write_all(render_processing_log(log, started_at).as_bytes())
        .map_err(write_error)?;
    file.flush().map_err(write_error)
}
