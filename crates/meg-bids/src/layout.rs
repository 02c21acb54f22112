use std::path::{Path, PathBuf};

/// Paths in the BIDS output tree.
///
/// Subjects are labelled by their numeric ID, so `sub-<n>` is always a valid
/// alphanumeric BIDS label and never leaks the source subject name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidsLayout {
    root: PathBuf,
}

impl BidsLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn subject_label(number: u32) -> String {
        number.to_string()
    }

    /// Session label for the `index`-th (0-based) recording of a subject.
    ///
    /// Raw session labels carry source names and separators, so the BIDS
    /// session is the 1-based position in the subject's sorted recordings.
    pub fn session_label(index: usize) -> String {
        (index + 1).to_string()
    }

    pub fn subject_dir(&self, number: u32) -> PathBuf {
        self.root.join(format!("sub-{number}"))
    }

    pub fn anat_dir(&self, number: u32) -> PathBuf {
        self.subject_dir(number).join("anat")
    }

    /// Defaced T1w image copied from the source MRI.
    pub fn image_target(&self, number: u32) -> PathBuf {
        self.anat_dir(number)
            .join(format!("sub-{number}_T1w_defaced.mri"))
    }

    /// Head-to-MRI transformation.
    pub fn trans_target(&self, number: u32) -> PathBuf {
        self.anat_dir(number).join(format!("sub-{number}-trans.fif"))
    }
}
