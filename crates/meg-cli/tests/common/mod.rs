//! Shared test fixtures.

#![allow(dead_code)]

use std::cell::RefCell;
use std::fs;
use std::path::Path;

use meg_bids::{ConversionRequest, ConvertError, RecordingConverter};

/// Writes `sub-<n>/meg/<recording>.fif`; fails or panics for chosen subjects.
pub struct FakeConverter {
    pub fail_subject: Option<&'static str>,
    pub panic_subject: Option<&'static str>,
}

impl FakeConverter {
    pub fn ok() -> Self {
        Self {
            fail_subject: None,
            panic_subject: None,
        }
    }

    pub fn failing(subject: &'static str) -> Self {
        Self {
            fail_subject: Some(subject),
            panic_subject: None,
        }
    }

    pub fn panicking(subject: &'static str) -> Self {
        Self {
            fail_subject: None,
            panic_subject: Some(subject),
        }
    }
}

impl RecordingConverter for FakeConverter {
    fn convert(&self, request: &ConversionRequest<'_>) -> Result<(), ConvertError> {
        let name = request
            .recording
            .file_name()
            .expect("recording name")
            .to_string_lossy()
            .to_string();
        if self.panic_subject.is_some_and(|s| name.starts_with(s)) {
            panic!("reader crashed on {name}");
        }
        if self.fail_subject.is_some_and(|s| name.starts_with(s)) {
            return Err(ConvertError::Failed {
                recording: request.recording.to_path_buf(),
                status: "exit status: 1".to_string(),
                message: "RuntimeError: corrupted recording".to_string(),
            });
        }
        let meg_dir = request
            .bids_root
            .join(format!("sub-{}", request.subject_label))
            .join("meg");
        fs::create_dir_all(&meg_dir).expect("create meg dir");
        fs::write(meg_dir.join(format!("{name}.fif")), name.as_bytes()).expect("write fif");
        Ok(())
    }

    fn name(&self) -> &str {
        "fake"
    }
}

/// Writes `.ds` directories into `sub-<n>/meg` the way a CTF-to-BIDS writer
/// does, and records the session label of every request.
#[derive(Default)]
pub struct CtfWriter {
    pub sessions: RefCell<Vec<Option<String>>>,
}

impl RecordingConverter for CtfWriter {
    fn convert(&self, request: &ConversionRequest<'_>) -> Result<(), ConvertError> {
        self.sessions
            .borrow_mut()
            .push(request.session.map(str::to_string));
        let subject = format!("sub-{}", request.subject_label);
        let stem = match request.session {
            Some(session) => format!("{subject}_ses-{session}_task-{}_meg.ds", request.task),
            None => format!("{subject}_task-{}_meg.ds", request.task),
        };
        let output = request.bids_root.join(&subject).join("meg").join(stem);
        fs::create_dir_all(&output).expect("create ds output");
        Ok(())
    }

    fn name(&self) -> &str {
        "ctf-writer"
    }
}

/// Creates recording directories and matching anatomy files under `root`.
pub fn populate(root: &Path, recordings: &[&str]) {
    let anat = root.join("anat");
    fs::create_dir_all(&anat).expect("create anat");
    for recording in recordings {
        fs::create_dir_all(root.join(recording)).expect("create recording");
        let subject = recording.split('_').next().expect("subject");
        fs::write(anat.join(format!("{subject}.mri")), b"mri").expect("write mri");
        fs::write(anat.join(format!("{subject}-trans.fif")), b"trans").expect("write trans");
    }
}
