//! Discovery of raw MEG recording directories and grouping by subject.

pub mod discovery;
pub mod error;
pub mod naming;
pub mod pattern;
pub mod resolver;

pub use discovery::{discover_recordings, discover_recordings_excluding};
pub use error::{IngestError, Result};
pub use naming::{
    NamingConvention, ParentDirectoryRule, ParsedName, RegexRule, SeparatorRule,
    SubjectNamingRule,
};
pub use pattern::{NamePattern, PatternKind};
pub use resolver::{Resolution, resolve_subjects};
