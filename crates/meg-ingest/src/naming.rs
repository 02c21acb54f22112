//! Subject and session naming conventions.
//!
//! Recording directory names are dataset specific, so the rule that turns a
//! path into a subject identity is chosen by configuration.

use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{IngestError, Result};

/// Subject identity parsed from a recording path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    pub subject: String,
    pub session: Option<String>,
}

/// Extracts a subject (and optional session) from a recording directory.
pub trait SubjectNamingRule {
    /// Returns `None` when the path does not follow the convention.
    fn parse(&self, path: &Path) -> Option<ParsedName>;

    /// Short description used in warnings.
    fn describe(&self) -> String;
}

/// `<subject><sep><session>[.ext]`, split at the first separator.
///
/// The split happens on the full directory name, so dots inside the subject
/// are kept. A trailing extension is removed from the session part. A name
/// without the separator is a single unlabelled session of the subject named
/// by the whole name, extension removed.
#[derive(Debug, Clone)]
pub struct SeparatorRule {
    separator: String,
}

impl SeparatorRule {
    pub fn new(separator: impl Into<String>) -> Result<Self> {
        let separator = separator.into();
        if separator.is_empty() {
            return Err(IngestError::InvalidRule {
                reason: "separator must not be empty".to_string(),
            });
        }
        Ok(Self { separator })
    }
}

impl SubjectNamingRule for SeparatorRule {
    fn parse(&self, path: &Path) -> Option<ParsedName> {
        let name = path.file_name()?.to_str()?;
        let (subject, session) = match name.split_once(self.separator.as_str()) {
            Some((subject, session)) => (subject, Some(strip_extension(session))),
            None => (strip_extension(name), None),
        };
        if subject.is_empty() {
            return None;
        }
        Some(ParsedName {
            subject: subject.to_string(),
            session: session.filter(|s| !s.is_empty()).map(str::to_string),
        })
    }

    fn describe(&self) -> String {
        format!("<subject>{}<session>", self.separator)
    }
}

/// Drops a trailing `.ext` whose extension is purely alphabetic (`.ds`, `.fif`).
fn strip_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((base, ext)) if !base.is_empty() && is_extension(ext) => base,
        _ => name,
    }
}

fn is_extension(ext: &str) -> bool {
    !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphabetic())
}

/// Regex over the directory name with a `subject` group and optional `session` group.
#[derive(Debug, Clone)]
pub struct RegexRule {
    regex: Regex,
}

impl RegexRule {
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| IngestError::InvalidPattern {
            pattern: pattern.to_string(),
            source: e,
        })?;
        if !regex.capture_names().flatten().any(|name| name == "subject") {
            return Err(IngestError::InvalidRule {
                reason: format!("subject regex '{pattern}' has no (?P<subject>...) group"),
            });
        }
        Ok(Self { regex })
    }
}

impl SubjectNamingRule for RegexRule {
    fn parse(&self, path: &Path) -> Option<ParsedName> {
        let name = path.file_name()?.to_str()?;
        let captures = self.regex.captures(name)?;
        let subject = captures.name("subject")?.as_str();
        if subject.is_empty() {
            return None;
        }
        let session = captures
            .name("session")
            .map(|m| m.as_str())
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        Some(ParsedName {
            subject: subject.to_string(),
            session,
        })
    }

    fn describe(&self) -> String {
        format!("regex {}", self.regex.as_str())
    }
}

/// `<root>/<subject>/<recording>`: the parent directory names the subject.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParentDirectoryRule;

impl SubjectNamingRule for ParentDirectoryRule {
    fn parse(&self, path: &Path) -> Option<ParsedName> {
        let subject = path.parent()?.file_name()?.to_str()?;
        let session = path.file_stem()?.to_str()?;
        Some(ParsedName {
            subject: subject.to_string(),
            session: Some(session.to_string()),
        })
    }

    fn describe(&self) -> String {
        "<subject>/<recording>".to_string()
    }
}

/// Configured naming convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum NamingConvention {
    Separator { separator: String },
    ParentDir,
    Regex { pattern: String },
}

impl Default for NamingConvention {
    fn default() -> Self {
        Self::Separator {
            separator: "_".to_string(),
        }
    }
}

impl NamingConvention {
    pub fn build(&self) -> Result<Box<dyn SubjectNamingRule>> {
        Ok(match self {
            Self::Separator { separator } => Box::new(SeparatorRule::new(separator.clone())?),
            Self::ParentDir => Box::new(ParentDirectoryRule),
            Self::Regex { pattern } => Box::new(RegexRule::new(pattern)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(subject: &str, session: Option<&str>) -> Option<ParsedName> {
        Some(ParsedName {
            subject: subject.to_string(),
            session: session.map(str::to_string),
        })
    }

    #[test]
    fn separator_splits_first_occurrence() {
        let rule = SeparatorRule::new("_").unwrap();
        assert_eq!(
            rule.parse(Path::new("/raw/subj01_session1")),
            parsed("subj01", Some("session1"))
        );
        assert_eq!(
            rule.parse(Path::new("/raw/AB12_example-REST_01.ds")),
            parsed("AB12", Some("example-REST_01"))
        );
        assert_eq!(rule.parse(Path::new("/raw/subj04")), parsed("subj04", None));
        assert_eq!(rule.parse(Path::new("/raw/subj05.ds")), parsed("subj05", None));
        assert_eq!(rule.parse(Path::new("/raw/_session1")), None);
    }

    #[test]
    fn separator_keeps_dots_in_subject() {
        let rule = SeparatorRule::new("_").unwrap();
        assert_eq!(
            rule.parse(Path::new("/raw/subj.01_s1")),
            parsed("subj.01", Some("s1"))
        );
        assert_eq!(
            rule.parse(Path::new("/raw/subj.02_s1.ds")),
            parsed("subj.02", Some("s1"))
        );
        assert_eq!(rule.parse(Path::new("/raw/subj.03")), parsed("subj.03", None));
        assert_eq!(
            rule.parse(Path::new("/raw/AB12_run.2")),
            parsed("AB12", Some("run.2"))
        );
    }

    #[test]
    fn empty_separator_is_rejected() {
        assert!(matches!(
            SeparatorRule::new(""),
            Err(IngestError::InvalidRule { .. })
        ));
    }

    #[test]
    fn regex_rule_requires_subject_group() {
        assert!(matches!(
            RegexRule::new(r"^(?P<session>\d+)$"),
            Err(IngestError::InvalidRule { .. })
        ));

        let rule = RegexRule::new(r"^(?P<subject>[A-Z]{2}\d{2})_.*_(?P<session>\d{2})\.ds$")
            .unwrap();
        assert_eq!(
            rule.parse(Path::new("/raw/AB12_example-REST_01.ds")),
            parsed("AB12", Some("01"))
        );
        assert_eq!(rule.parse(Path::new("/raw/readme")), None);
    }

    #[test]
    fn parent_directory_names_subject() {
        let rule = ParentDirectoryRule;
        assert_eq!(
            rule.parse(Path::new("/raw/AB12/AB12_example-REST_01.ds")),
            parsed("AB12", Some("AB12_example-REST_01"))
        );
    }

    #[test]
    fn convention_builds_rules() {
        let rule = NamingConvention::default().build().unwrap();
        assert_eq!(rule.describe(), "<subject>_<session>");
        let rule = NamingConvention::ParentDir.build().unwrap();
        assert!(rule.parse(Path::new("/a/b")).is_some());
    }
}
