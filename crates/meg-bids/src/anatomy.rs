//! Association of anatomical and transformation files with a subject.

use std::path::{Path, PathBuf};

use meg_model::SubjectRecord;
use serde::{Deserialize, Serialize};

/// Where a subject's MRI image and head transformation live.
///
/// Files are looked up in `<recording parent>/<anat_dir>` using the first
/// recording of the subject. `{subject}` in a template is replaced with the
/// subject name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnatomyRule {
    pub anat_dir: String,
    pub image_template: String,
    pub trans_template: String,
}

impl Default for AnatomyRule {
    fn default() -> Self {
        Self {
            anat_dir: "anat".to_string(),
            image_template: "{subject}.mri".to_string(),
            trans_template: "{subject}-trans.fif".to_string(),
        }
    }
}

/// Source paths resolved for one subject. They may not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnatomyFiles {
    pub image: PathBuf,
    pub trans: PathBuf,
}

impl AnatomyRule {
    pub fn locate(&self, record: &SubjectRecord) -> Option<AnatomyFiles> {
        let anchor = record.anchor()?;
        let base = anchor.path.parent().unwrap_or_else(|| Path::new(""));
        let dir = base.join(&self.anat_dir);
        Some(AnatomyFiles {
            image: dir.join(render(&self.image_template, &record.name)),
            trans: dir.join(render(&self.trans_template, &record.name)),
        })
    }
}

fn render(template: &str, subject: &str) -> String {
    template.replace("{subject}", subject)
}

#[cfg(test)]
mod tests {
    use super::*;
    use meg_model::RawRecordingDirectory;

    #[test]
    fn locates_next_to_first_recording() {
        let mut record = SubjectRecord::new("AB12");
        record.push(RawRecordingDirectory::new(
            "/raw/AB12/AB12_rest_02.ds",
            "AB12",
            Some("AB12_rest_02".to_string()),
        ));
        record.push(RawRecordingDirectory::new(
            "/raw/AB12/AB12_rest_01.ds",
            "AB12",
            Some("AB12_rest_01".to_string()),
        ));

        let files = AnatomyRule::default().locate(&record).unwrap();
        assert_eq!(files.image, PathBuf::from("/raw/AB12/anat/AB12.mri"));
        assert_eq!(files.trans, PathBuf::from("/raw/AB12/anat/AB12-trans.fif"));
    }

    #[test]
    fn custom_templates() {
        let mut record = SubjectRecord::new("subj01");
        record.push(RawRecordingDirectory::new("/raw/subj01_s1", "subj01", None));
        let rule = AnatomyRule {
            anat_dir: "mri".to_string(),
            image_template: "{subject}_T1.mri".to_string(),
            trans_template: "trans/{subject}.fif".to_string(),
        };

        let files = rule.locate(&record).unwrap();
        assert_eq!(files.image, PathBuf::from("/raw/mri/subj01_T1.mri"));
        assert_eq!(files.trans, PathBuf::from("/raw/mri/trans/subj01.fif"));
    }

    #[test]
    fn empty_record_has_no_anatomy() {
        assert!(AnatomyRule::default().locate(&SubjectRecord::new("x")).is_none());
    }
}
