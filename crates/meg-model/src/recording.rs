use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A directory believed to hold one MEG recording session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecordingDirectory {
    pub path: PathBuf,
    pub subject: String,
    /// Session or run label parsed from the directory name, if any.
    pub session: Option<String>,
}

impl RawRecordingDirectory {
    pub fn new(
        path: impl Into<PathBuf>,
        subject: impl Into<String>,
        session: Option<String>,
    ) -> Self {
        Self {
            path: path.into(),
            subject: subject.into(),
            session,
        }
    }

    /// Ordering key within a subject: unlabelled first, then by label, then by path.
    fn sort_key(&self) -> (Option<&str>, &PathBuf) {
        (self.session.as_deref(), &self.path)
    }
}

/// All recordings that belong to one subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectRecord {
    pub name: String,
    pub recordings: Vec<RawRecordingDirectory>,
}

impl SubjectRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            recordings: Vec::new(),
        }
    }

    /// Adds a recording, keeping sessions in ascending label order.
    pub fn push(&mut self, recording: RawRecordingDirectory) {
        let position = self
            .recordings
            .partition_point(|existing| existing.sort_key() <= recording.sort_key());
        self.recordings.insert(position, recording);
    }

    pub fn session_count(&self) -> usize {
        self.recordings.len()
    }

    /// The recording used to locate anatomy files for this subject.
    pub fn anchor(&self) -> Option<&RawRecordingDirectory> {
        self.recordings.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording(path: &str, session: Option<&str>) -> RawRecordingDirectory {
        RawRecordingDirectory::new(path, "subj01", session.map(str::to_string))
    }

    #[test]
    fn push_keeps_sessions_sorted() {
        let mut record = SubjectRecord::new("subj01");
        record.push(recording("/data/subj01_session2", Some("session2")));
        record.push(recording("/data/subj01_session1", Some("session1")));
        record.push(recording("/data/subj01", None));

        let sessions: Vec<Option<&str>> = record
            .recordings
            .iter()
            .map(|r| r.session.as_deref())
            .collect();
        assert_eq!(sessions, vec![None, Some("session1"), Some("session2")]);
        assert_eq!(record.anchor().unwrap().path, PathBuf::from("/data/subj01"));
    }

    #[test]
    fn equal_labels_fall_back_to_path() {
        let mut record = SubjectRecord::new("subj01");
        record.push(recording("/b/subj01_rest", Some("rest")));
        record.push(recording("/a/subj01_rest", Some("rest")));

        assert_eq!(record.recordings[0].path, PathBuf::from("/a/subj01_rest"));
        assert_eq!(record.session_count(), 2);
    }
}
