//! Directory name patterns.

use std::fmt;
use std::str::FromStr;

use regex::Regex;

use crate::error::{IngestError, Result};

/// Pattern a directory name must match to count as a recording.
///
/// Written as `glob:<pattern>`, `regex:<pattern>`, or a bare glob.
/// Globs must match the whole name; regexes are matched from the start of
/// the name only, so append `$` to pin the end.
#[derive(Debug, Clone)]
pub struct NamePattern {
    source: String,
    kind: PatternKind,
    regex: Regex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    Glob,
    Regex,
}

impl NamePattern {
    pub fn glob(pattern: &str) -> Result<Self> {
        let mut translated = String::with_capacity(pattern.len() + 8);
        translated.push('^');
        for ch in pattern.chars() {
            match ch {
                '*' => translated.push_str(".*"),
                '?' => translated.push('.'),
                other => translated.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
            }
        }
        translated.push('$');
        Self::compile(pattern, PatternKind::Glob, &translated)
    }

    pub fn regex(pattern: &str) -> Result<Self> {
        Self::compile(pattern, PatternKind::Regex, &format!("^(?:{pattern})"))
    }

    fn compile(source: &str, kind: PatternKind, expr: &str) -> Result<Self> {
        let regex = Regex::new(expr).map_err(|e| IngestError::InvalidPattern {
            pattern: source.to_string(),
            source: e,
        })?;
        Ok(Self {
            source: source.to_string(),
            kind,
            regex,
        })
    }

    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    pub fn is_match(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }
}

impl FromStr for NamePattern {
    type Err = IngestError;

    fn from_str(value: &str) -> Result<Self> {
        if let Some(rest) = value.strip_prefix("regex:") {
            Self::regex(rest)
        } else if let Some(rest) = value.strip_prefix("glob:") {
            Self::glob(rest)
        } else {
            Self::glob(value)
        }
    }
}

impl fmt::Display for NamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            PatternKind::Glob => write!(f, "glob:{}", self.source),
            PatternKind::Regex => write!(f, "regex:{}", self.source),
        }
    }
}
