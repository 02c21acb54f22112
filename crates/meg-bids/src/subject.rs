//! Per-subject conversion with a local failure boundary.

use std::fs;
use std::path::{Path, PathBuf};

use meg_model::{ConversionResult, SubjectRecord};
use tracing::{debug, info, info_span, warn};

use crate::anatomy::AnatomyRule;
use crate::converter::{ConversionRequest, RecordingConverter};
use crate::error::{ConvertError, Result};
use crate::layout::BidsLayout;

/// Settings shared by every subject of a run.
#[derive(Debug, Clone)]
pub struct SubjectOptions {
    pub layout: BidsLayout,
    pub task: String,
    pub format: String,
    pub anonymize: bool,
    pub anatomy: AnatomyRule,
    /// Treat a missing anatomy file as a subject failure.
    pub require_anatomy: bool,
}

/// Converts every recording of `record` and copies its anatomy files.
///
/// Errors never escape: they are folded into the returned result together
/// with whatever was written before the failure. Nothing is rolled back.
pub fn convert_subject(
    record: &SubjectRecord,
    number: u32,
    converter: &dyn RecordingConverter,
    options: &SubjectOptions,
) -> ConversionResult {
    let mut outputs = Vec::new();
    match convert_into(record, number, converter, options, &mut outputs) {
        Ok(()) => ConversionResult::success(record.name.clone(), number, outputs),
        Err(error) => {
            ConversionResult::failed(record.name.clone(), number, error.to_string(), outputs)
        }
    }
}

fn convert_into(
    record: &SubjectRecord,
    number: u32,
    converter: &dyn RecordingConverter,
    options: &SubjectOptions,
    outputs: &mut Vec<PathBuf>,
) -> Result<()> {
    let converted = convert_recordings(record, number, converter, options);
    let subject_dir = options.layout.subject_dir(number);
    if subject_dir.exists() {
        outputs.push(subject_dir);
    }
    converted?;
    copy_anatomy(record, number, options, outputs)
}

fn convert_recordings(
    record: &SubjectRecord,
    number: u32,
    converter: &dyn RecordingConverter,
    options: &SubjectOptions,
) -> Result<()> {
    let label = BidsLayout::subject_label(number);
    // A lone unlabelled recording gets no session entity.
    let sessioned =
        record.recordings.len() > 1 || record.recordings.iter().any(|r| r.session.is_some());
    for (index, recording) in record.recordings.iter().enumerate() {
        let session = sessioned.then(|| BidsLayout::session_label(index));
        let span = info_span!(
            "recording",
            path = %recording.path.display(),
            raw_session = recording.session.as_deref().unwrap_or("-"),
            session = session.as_deref().unwrap_or("-")
        );
        let _guard = span.enter();
        let request = ConversionRequest {
            recording: &recording.path,
            subject_label: &label,
            session: session.as_deref(),
            task: &options.task,
            anonymize: options.anonymize,
            bids_root: options.layout.root(),
            format: &options.format,
        };
        converter.convert(&request)?;
        debug!(converter = converter.name(), "recording converted");
    }
    Ok(())
}

fn copy_anatomy(
    record: &SubjectRecord,
    number: u32,
    options: &SubjectOptions,
    outputs: &mut Vec<PathBuf>,
) -> Result<()> {
    let Some(files) = options.anatomy.locate(record) else {
        return Ok(());
    };
    let copies = [
        ("anatomical image", files.image, options.layout.image_target(number)),
        ("transformation", files.trans, options.layout.trans_target(number)),
    ];

    let mut pending = Vec::with_capacity(copies.len());
    for (kind, from, to) in copies {
        if from.is_file() {
            pending.push((from, to));
        } else if options.require_anatomy {
            return Err(ConvertError::MissingAnatomy { kind, path: from });
        } else {
            warn!(
                subject = %record.name,
                path = %from.display(),
                "{kind} file not found, skipping"
            );
        }
    }

    for (from, to) in pending {
        create_parent(&to)?;
        fs::copy(&from, &to).map_err(|e| ConvertError::Copy {
            from: from.clone(),
            to: to.clone(),
            source: e,
        })?;
        info!(from = %from.display(), to = %to.display(), "copied anatomy file");
        outputs.push(to);
    }
    Ok(())
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ConvertError::CreateDir {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    Ok(())
}
