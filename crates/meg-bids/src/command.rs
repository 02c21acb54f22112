//! Converter backed by an external program.

use std::ffi::OsString;
use std::process::Command;

use tracing::{debug, trace};

use crate::converter::{ConversionRequest, RecordingConverter};
use crate::error::{ConvertError, Result};

/// Runs an external program once per recording.
///
/// The program receives `[fixed args...] --recording <path> --subject <label>
/// [--session <label>] --task <task> --bids-root <dir> --format <fmt>
/// [--anonymize]` and must exit with status 0 on success. The last non-empty
/// line of its stderr is used as the failure message.
#[derive(Debug, Clone)]
pub struct CommandConverter {
    program: String,
    args: Vec<String>,
}

impl CommandConverter {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Arguments placed before the generated ones (e.g. a script path).
    #[must_use]
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn arguments(&self, request: &ConversionRequest<'_>) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.args.iter().map(OsString::from).collect();
        args.push("--recording".into());
        args.push(request.recording.as_os_str().to_owned());
        args.push("--subject".into());
        args.push(request.subject_label.into());
        if let Some(session) = request.session {
            args.push("--session".into());
            args.push(session.into());
        }
        args.push("--task".into());
        args.push(request.task.into());
        args.push("--bids-root".into());
        args.push(request.bids_root.as_os_str().to_owned());
        args.push("--format".into());
        args.push(request.format.into());
        if request.anonymize {
            args.push("--anonymize".into());
        }
        args
    }
}

impl RecordingConverter for CommandConverter {
    fn convert(&self, request: &ConversionRequest<'_>) -> Result<()> {
        let args = self.arguments(request);
        debug!(program = %self.program, ?args, "running converter");
        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|e| ConvertError::Spawn {
                program: self.program.clone(),
                source: e,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            trace!(program = %self.program, stdout = %stdout.trim(), "converter output");
        }
        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let message = stderr
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or("no error output")
            .to_string();
        Err(ConvertError::Failed {
            recording: request.recording.to_path_buf(),
            status: output.status.to_string(),
            message,
        })
    }

    fn name(&self) -> &str {
        &self.program
    }
}
