use serde::{Deserialize, Serialize};

/// One row of the subject mapping file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectMappingEntry {
    #[serde(rename = "Subject")]
    pub subject: String,
    #[serde(rename = "Number")]
    pub number: u32,
}

impl SubjectMappingEntry {
    pub fn new(subject: impl Into<String>, number: u32) -> Self {
        Self {
            subject: subject.into(),
            number,
        }
    }

    /// BIDS subject label derived from the number (e.g. `sub-3`).
    pub fn bids_label(&self) -> String {
        format!("sub-{}", self.number)
    }
}
