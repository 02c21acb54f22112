//! meg2bids CLI.

use clap::{ColorChoice, Parser};
use meg_bids::CommandConverter;
use meg_cli::config::PipelineConfig;
use meg_cli::logging::{LogConfig, LogFormat, init_logging};
use meg_cli::run::run;
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;
mod summary;

use crate::cli::{Cli, LogFormatArg, LogLevelArg};
use crate::summary::print_summary;

/// Every subject converted, or there was nothing to convert.
const EXIT_OK: i32 = 0;
/// The batch finished but at least one subject failed.
const EXIT_PARTIAL: i32 = 1;
/// Configuration, discovery, or mapping write failed.
const EXIT_FATAL: i32 = 2;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("fatal: failed to initialize logging: {error}");
        std::process::exit(EXIT_FATAL);
    }
    let exit_code = match execute(&cli) {
        Ok(summary) => {
            print_summary(&summary);
            if summary.has_failures() {
                eprintln!(
                    "partial failure: {} of {} subjects failed; see {}",
                    summary.report.failure_count(),
                    summary.report.results.len(),
                    summary.processing_log.display()
                );
                EXIT_PARTIAL
            } else {
                EXIT_OK
            }
        }
        Err(error) => {
            eprintln!("fatal: {error:#}");
            EXIT_FATAL
        }
    };
    std::process::exit(exit_code);
}

fn execute(cli: &Cli) -> anyhow::Result<meg_cli::run::RunSummary> {
    let mut config = PipelineConfig::load(cli.config.as_deref())?;
    config.apply(cli.overrides()?);
    let converter = CommandConverter::new(config.converter.program.clone())
        .with_args(config.converter.args.clone());
    run(&config, &converter)
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
