use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Outcome of one subject attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Success,
    Failed { error: String },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Per-subject conversion result.
///
/// `outputs` lists every path written for the subject, including on failure,
/// so partial output can be located and cleaned up by hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub subject: String,
    pub number: u32,
    pub outcome: Outcome,
    pub outputs: Vec<PathBuf>,
}

impl ConversionResult {
    pub fn success(subject: impl Into<String>, number: u32, outputs: Vec<PathBuf>) -> Self {
        Self {
            subject: subject.into(),
            number,
            outcome: Outcome::Success,
            outputs,
        }
    }

    pub fn failed(
        subject: impl Into<String>,
        number: u32,
        error: impl Into<String>,
        outputs: Vec<PathBuf>,
    ) -> Self {
        Self {
            subject: subject.into(),
            number,
            outcome: Outcome::Failed {
                error: error.into(),
            },
            outputs,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Success => None,
            Outcome::Failed { error } => Some(error),
        }
    }
}
