//! CLI argument definitions for meg2bids.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;

use meg_cli::config::{ConfigError, ConfigOverrides, NamingKind, naming_from_flags};

#[derive(Parser)]
#[command(
    name = "meg2bids",
    version,
    about = "Convert raw MEG recordings into an anonymized BIDS dataset",
    long_about = "Find raw MEG recording directories, group them by subject, convert each \
                  subject into BIDS with anonymization, copy anatomy files, and write a \
                  subject-to-number mapping.\n\n\
                  Exit status: 0 when every subject converted, 1 when some subjects \
                  failed, 2 on a fatal error."
)]
pub struct Cli {
    /// Directory searched recursively for recording directories.
    #[arg(value_name = "SEARCH_ROOT")]
    pub search_root: Option<PathBuf>,

    /// TOML configuration file; flags override its values.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// BIDS output root (default: <SEARCH_ROOT>/bids).
    #[arg(long = "bids-root", value_name = "DIR")]
    pub bids_root: Option<PathBuf>,

    /// Recording directory name pattern: glob:<p>, regex:<p>, or a bare glob (default: glob:*.ds).
    #[arg(long = "pattern", value_name = "PATTERN")]
    pub pattern: Option<String>,

    /// How subject and session are read from a recording path (default: separator).
    #[arg(long = "naming", value_enum)]
    pub naming: Option<NamingArg>,

    /// Separator between subject and session for --naming separator (default: _).
    #[arg(long = "separator", value_name = "SEP")]
    pub separator: Option<String>,

    /// Regex with a `subject` and optional `session` named group for --naming regex.
    #[arg(long = "subject-regex", value_name = "REGEX")]
    pub subject_regex: Option<String>,

    /// Keep identifying metadata (anonymization is on by default).
    #[arg(long = "no-anonymize")]
    pub no_anonymize: bool,

    /// External converter program (default: meg2bids-convert).
    #[arg(long = "converter", value_name = "PROGRAM")]
    pub converter: Option<String>,

    /// Argument passed to the converter before the generated ones (repeatable).
    #[arg(long = "converter-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub converter_args: Vec<String>,

    /// BIDS task label (default: rest).
    #[arg(long = "task")]
    pub task: Option<String>,

    /// Output data format passed to the converter (default: FIF).
    #[arg(long = "format")]
    pub format: Option<String>,

    /// Subject mapping CSV (default: subjects.csv beside the BIDS root).
    #[arg(long = "mapping-file", value_name = "PATH")]
    pub mapping_file: Option<PathBuf>,

    /// Processing log file (default: bids.log).
    #[arg(long = "processing-log", value_name = "PATH")]
    pub processing_log: Option<PathBuf>,

    /// Replace the processing log instead of appending to it.
    #[arg(long = "overwrite-log")]
    pub overwrite_log: bool,

    /// Convert subjects even when their anatomy files are missing.
    #[arg(long = "allow-missing-anatomy")]
    pub allow_missing_anatomy: bool,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,

    /// Write diagnostic logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn overrides(&self) -> Result<ConfigOverrides, ConfigError> {
        Ok(ConfigOverrides {
            search_root: self.search_root.clone(),
            bids_root: self.bids_root.clone(),
            pattern: self.pattern.clone(),
            naming: naming_from_flags(
                self.naming.map(NamingArg::kind),
                self.separator.clone(),
                self.subject_regex.clone(),
            )?,
            no_anonymize: self.no_anonymize,
            converter: self.converter.clone(),
            converter_args: self.converter_args.clone(),
            task: self.task.clone(),
            format: self.format.clone(),
            mapping_file: self.mapping_file.clone(),
            processing_log: self.processing_log.clone(),
            overwrite_log: self.overwrite_log,
            allow_missing_anatomy: self.allow_missing_anatomy,
        })
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum NamingArg {
    /// <subject><sep><session>
    Separator,
    /// <subject>/<recording>
    ParentDir,
    /// --subject-regex with named groups
    Regex,
}

impl NamingArg {
    fn kind(self) -> NamingKind {
        match self {
            Self::Separator => NamingKind::Separator,
            Self::ParentDir => NamingKind::ParentDir,
            Self::Regex => NamingKind::Regex,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
