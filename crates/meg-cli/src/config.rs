//! Run configuration.
//!
//! Values come from built-in defaults, then an optional TOML file, then
//! command-line flags, each layer overriding the previous one. Every default
//! is a named constant below.

use std::path::{Path, PathBuf};

use meg_bids::AnatomyRule;
use meg_ingest::NamingConvention;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Directory name pattern: CTF recordings are `.ds` directories.
pub const DEFAULT_PATTERN: &str = "glob:*.ds";
/// BIDS output goes to `<search root>/bids` unless configured.
pub const DEFAULT_BIDS_DIR: &str = "bids";
/// Mapping file is written next to the BIDS root.
pub const DEFAULT_MAPPING_FILE: &str = "subjects.csv";
/// Processing log, relative to the working directory.
pub const DEFAULT_PROCESSING_LOG: &str = "bids.log";
/// External converter program.
pub const DEFAULT_CONVERTER: &str = "meg2bids-convert";
pub const DEFAULT_TASK: &str = "rest";
pub const DEFAULT_FORMAT: &str = "FIF";
pub const DEFAULT_ANONYMIZE: bool = true;
pub const DEFAULT_REQUIRE_ANATOMY: bool = true;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("no search root given (pass SEARCH_ROOT or set search_root in the config file)")]
    MissingSearchRoot,

    #[error("--naming regex requires --subject-regex")]
    MissingSubjectRegex,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConverterConfig {
    pub program: String,
    /// Passed before the generated per-recording arguments.
    pub args: Vec<String>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_CONVERTER.to_string(),
            args: Vec::new(),
        }
    }
}

/// Complete configuration of one batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Required; there is no default search root.
    pub search_root: Option<PathBuf>,
    pub bids_root: Option<PathBuf>,
    pub pattern: String,
    pub naming: NamingConvention,
    pub anonymize: bool,
    pub converter: ConverterConfig,
    pub task: String,
    pub format: String,
    pub anatomy: AnatomyRule,
    pub require_anatomy: bool,
    pub mapping_file: Option<PathBuf>,
    pub processing_log: PathBuf,
    pub overwrite_log: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            search_root: None,
            bids_root: None,
            pattern: DEFAULT_PATTERN.to_string(),
            naming: NamingConvention::default(),
            anonymize: DEFAULT_ANONYMIZE,
            converter: ConverterConfig::default(),
            task: DEFAULT_TASK.to_string(),
            format: DEFAULT_FORMAT.to_string(),
            anatomy: AnatomyRule::default(),
            require_anatomy: DEFAULT_REQUIRE_ANATOMY,
            mapping_file: None,
            processing_log: PathBuf::from(DEFAULT_PROCESSING_LOG),
            overwrite_log: false,
        }
    }
}

impl PipelineConfig {
    pub fn from_toml_str(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&text, path)
    }

    /// Loads `path` if given, otherwise starts from the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_toml_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn search_root(&self) -> Result<&Path, ConfigError> {
        self.search_root
            .as_deref()
            .ok_or(ConfigError::MissingSearchRoot)
    }

    pub fn bids_root(&self) -> Result<PathBuf, ConfigError> {
        match &self.bids_root {
            Some(root) => Ok(root.clone()),
            None => Ok(self.search_root()?.join(DEFAULT_BIDS_DIR)),
        }
    }

    /// Explicit path, or `subjects.csv` beside the BIDS root.
    pub fn mapping_file(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.mapping_file {
            return Ok(path.clone());
        }
        let bids_root = self.bids_root()?;
        let parent = bids_root
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        Ok(parent.join(DEFAULT_MAPPING_FILE))
    }

    pub fn apply(&mut self, overrides: ConfigOverrides) {
        let ConfigOverrides {
            search_root,
            bids_root,
            pattern,
            naming,
            no_anonymize,
            converter,
            converter_args,
            task,
            format,
            mapping_file,
            processing_log,
            overwrite_log,
            allow_missing_anatomy,
        } = overrides;
        if search_root.is_some() {
            self.search_root = search_root;
        }
        if bids_root.is_some() {
            self.bids_root = bids_root;
        }
        if let Some(pattern) = pattern {
            self.pattern = pattern;
        }
        if let Some(naming) = naming {
            self.naming = naming;
        }
        if no_anonymize {
            self.anonymize = false;
        }
        if let Some(program) = converter {
            self.converter.program = program;
        }
        if !converter_args.is_empty() {
            self.converter.args = converter_args;
        }
        if let Some(task) = task {
            self.task = task;
        }
        if let Some(format) = format {
            self.format = format;
        }
        if mapping_file.is_some() {
            self.mapping_file = mapping_file;
        }
        if let Some(path) = processing_log {
            self.processing_log = path;
        }
        if overwrite_log {
            self.overwrite_log = true;
        }
        if allow_missing_anatomy {
            self.require_anatomy = false;
        }
    }
}

/// Command-line values layered over the file configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub search_root: Option<PathBuf>,
    pub bids_root: Option<PathBuf>,
    pub pattern: Option<String>,
    pub naming: Option<NamingConvention>,
    pub no_anonymize: bool,
    pub converter: Option<String>,
    pub converter_args: Vec<String>,
    pub task: Option<String>,
    pub format: Option<String>,
    pub mapping_file: Option<PathBuf>,
    pub processing_log: Option<PathBuf>,
    pub overwrite_log: bool,
    pub allow_missing_anatomy: bool,
}

/// Naming convention selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamingKind {
    Separator,
    ParentDir,
    Regex,
}

/// Builds a naming convention from CLI flags; `None` keeps the configured one.
pub fn naming_from_flags(
    kind: Option<NamingKind>,
    separator: Option<String>,
    subject_regex: Option<String>,
) -> Result<Option<NamingConvention>, ConfigError> {
    let kind = match (kind, &separator, &subject_regex) {
        (Some(kind), _, _) => kind,
        (None, _, Some(_)) => NamingKind::Regex,
        (None, Some(_), None) => NamingKind::Separator,
        (None, None, None) => return Ok(None),
    };
    Ok(Some(match kind {
        NamingKind::Separator => NamingConvention::Separator {
            separator: separator.unwrap_or_else(|| "_".to_string()),
        },
        NamingKind::ParentDir => NamingConvention::ParentDir,
        NamingKind::Regex => NamingConvention::Regex {
            pattern: subject_regex.ok_or(ConfigError::MissingSubjectRegex)?,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_explicit() {
        let config = PipelineConfig::default();
        assert_eq!(config.pattern, "glob:*.ds");
        assert!(config.anonymize);
        assert!(config.require_anatomy);
        assert_eq!(config.processing_log, PathBuf::from("bids.log"));
        assert!(matches!(
            config.search_root(),
            Err(ConfigError::MissingSearchRoot)
        ));
    }

    #[test]
    fn derived_paths() {
        let config = PipelineConfig {
            search_root: Some(PathBuf::from("/meg/raw")),
            ..PipelineConfig::default()
        };
        assert_eq!(config.bids_root().unwrap(), PathBuf::from("/meg/raw/bids"));
        assert_eq!(
            config.mapping_file().unwrap(),
            PathBuf::from("/meg/raw/subjects.csv")
        );

        let relative = PipelineConfig {
            search_root: Some(PathBuf::from("raw")),
            bids_root: Some(PathBuf::from("bids")),
            ..PipelineConfig::default()
        };
        assert_eq!(
            relative.mapping_file().unwrap(),
            PathBuf::from("./subjects.csv")
        );
    }

    #[test]
    fn toml_file_overrides_defaults() {
        let text = r#"
search_root = "/meg/raw"
pattern = 'regex:.*_example-REST_.*_01\.ds$'
anonymize = false

[naming]
kind = "parent-dir"

[converter]
program = "python3"
args = ["convert_ctf.py"]

[anatomy]
anat_dir = "mri"
"#;
        let config = PipelineConfig::from_toml_str(text, Path::new("meg2bids.toml")).unwrap();
        assert_eq!(config.search_root, Some(PathBuf::from("/meg/raw")));
        assert_eq!(config.naming, NamingConvention::ParentDir);
        assert!(!config.anonymize);
        assert_eq!(config.converter.args, vec!["convert_ctf.py"]);
        assert_eq!(config.anatomy.anat_dir, "mri");
        assert_eq!(config.anatomy.image_template, "{subject}.mri");
        assert_eq!(config.task, DEFAULT_TASK);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = PipelineConfig::from_toml_str("search_rot = 'x'", Path::new("c.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn flags_override_file_values() {
        let mut config = PipelineConfig {
            search_root: Some(PathBuf::from("/from/file")),
            task: "noise".to_string(),
            ..PipelineConfig::default()
        };
        config.apply(ConfigOverrides {
            search_root: Some(PathBuf::from("/from/cli")),
            no_anonymize: true,
            allow_missing_anatomy: true,
            ..ConfigOverrides::default()
        });
        assert_eq!(config.search_root, Some(PathBuf::from("/from/cli")));
        assert_eq!(config.task, "noise");
        assert!(!config.anonymize);
        assert!(!config.require_anatomy);
    }

    #[test]
    fn naming_flags() {
        assert_eq!(naming_from_flags(None, None, None).unwrap(), None);
        assert_eq!(
            naming_from_flags(None, Some("-".to_string()), None).unwrap(),
            Some(NamingConvention::Separator {
                separator: "-".to_string()
            })
        );
        assert!(matches!(
            naming_from_flags(Some(NamingKind::Regex), None, None),
            Err(ConfigError::MissingSubjectRegex)
        ));
        assert_eq!(
            naming_from_flags(None, None, Some("(?P<subject>.+)".to_string())).unwrap(),
            Some(NamingConvention::Regex {
                pattern: "(?P<subject>.+)".to_string()
            })
        );
    }
}
