//! Append-only record of one batch run.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::conversion::{ConversionResult, Outcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogEntry {
    /// A discovered directory was skipped before any ID was assigned.
    Warning { message: String },
    /// One subject attempt.
    Subject {
        subject: String,
        number: u32,
        outcome: Outcome,
        outputs: Vec<PathBuf>,
    },
}

impl LogEntry {
    pub fn level(&self) -> LogLevel {
        match self {
            Self::Warning { .. } => LogLevel::Warning,
            Self::Subject {
                outcome: Outcome::Success,
                ..
            } => LogLevel::Info,
            Self::Subject {
                outcome: Outcome::Failed { .. },
                ..
            } => LogLevel::Error,
        }
    }

    /// Message text without the level prefix.
    pub fn message(&self) -> String {
        match self {
            Self::Warning { message } => message.clone(),
            Self::Subject {
                subject,
                number,
                outcome: Outcome::Success,
                outputs,
            } => format!(
                "{subject} converted as sub-{number} ({} files)",
                outputs.len()
            ),
            Self::Subject {
                subject,
                number,
                outcome: Outcome::Failed { error },
                outputs,
            } => {
                let mut message = format!("{subject} (sub-{number}) failed: {error}");
                if !outputs.is_empty() {
                    let paths: Vec<String> =
                        outputs.iter().map(|p| p.display().to_string()).collect();
                    message.push_str("; partial output: ");
                    message.push_str(&paths.join(", "));
                }
                message
            }
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.level(), self.message())
    }
}

/// Entries are only ever appended; order is attempt order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingLog {
    entries: Vec<LogEntry>,
}

impl ProcessingLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.entries.push(LogEntry::Warning {
            message: message.into(),
        });
    }

    pub fn record(&mut self, result: &ConversionResult) {
        self.entries.push(LogEntry::Subject {
            subject: result.subject.clone(),
            number: result.number,
            outcome: result.outcome.clone(),
            outputs: result.outputs.clone(),
        });
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn failure_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.level() == LogLevel::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.level() == LogLevel::Warning)
            .count()
    }

    /// Renders the log as `LEVEL - message` lines.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.entries.iter().map(ToString::to_string)
    }
}
