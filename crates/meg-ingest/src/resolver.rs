//! Grouping of discovered directories into subjects.

use std::collections::BTreeMap;
use std::path::PathBuf;

use meg_model::{RawRecordingDirectory, SubjectRecord};
use tracing::{debug, warn};

use crate::naming::SubjectNamingRule;

/// Subjects in name order plus the directories that were skipped.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub subjects: Vec<SubjectRecord>,
    pub warnings: Vec<String>,
}

impl Resolution {
    pub fn recording_count(&self) -> usize {
        self.subjects.iter().map(SubjectRecord::session_count).sum()
    }
}

/// Groups directories by subject using `rule`.
///
/// Every parsable directory lands in exactly one subject. Directories the
/// rule cannot parse are left out and reported as warnings.
pub fn resolve_subjects(dirs: &[PathBuf], rule: &dyn SubjectNamingRule) -> Resolution {
    let mut grouped: BTreeMap<String, SubjectRecord> = BTreeMap::new();
    let mut warnings = Vec::new();

    for path in dirs {
        let Some(parsed) = rule.parse(path) else {
            let message = format!(
                "skipped {}: name does not follow the naming convention {}",
                path.display(),
                rule.describe()
            );
            warn!(path = %path.display(), "directory name does not follow the naming convention");
            warnings.push(message);
            continue;
        };
        debug!(
            path = %path.display(),
            subject = %parsed.subject,
            session = parsed.session.as_deref().unwrap_or("-"),
            "resolved recording"
        );
        grouped
            .entry(parsed.subject.clone())
            .or_insert_with(|| SubjectRecord::new(parsed.subject.clone()))
            .push(RawRecordingDirectory::new(
                path.clone(),
                parsed.subject,
                parsed.session,
            ));
    }

    Resolution {
        subjects: grouped.into_values().collect(),
        warnings,
    }
}
