use std::path::Path;

use crate::error::Result;

/// Inputs for converting one recording.
#[derive(Debug, Clone, Copy)]
pub struct ConversionRequest<'a> {
    pub recording: &'a Path,
    /// BIDS subject label (without the `sub-` prefix).
    pub subject_label: &'a str,
    /// BIDS session label (without the `ses-` prefix); always alphanumeric.
    pub session: Option<&'a str>,
    pub task: &'a str,
    pub anonymize: bool,
    pub bids_root: &'a Path,
    /// Output data format, e.g. `FIF`.
    pub format: &'a str,
}

/// External anonymizing format converter.
///
/// Implementations read the raw recording, strip identifying metadata when
/// `anonymize` is set, and write standardized output under `bids_root` for
/// `sub-<subject_label>`. They must not modify the recording.
pub trait RecordingConverter {
    fn convert(&self, request: &ConversionRequest<'_>) -> Result<()>;

    /// Name used in logs.
    fn name(&self) -> &str;
}
