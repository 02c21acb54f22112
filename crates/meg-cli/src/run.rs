//! End-to-end run: discover, resolve, convert, write outputs.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Utc;
use meg_bids::{BidsLayout, RecordingConverter, SubjectOptions};
use meg_ingest::{NamePattern, discover_recordings_excluding, resolve_subjects};
use meg_model::{ProcessingLog, SubjectRecord};
use meg_report::{LogWriteMode, write_mapping, write_processing_log};
use tracing::{error, info, info_span};

use crate::config::PipelineConfig;
use crate::pipeline::{BatchReport, run_batch};

/// Result of a run that reached the end of the batch.
#[derive(Debug)]
pub struct RunSummary {
    pub search_root: PathBuf,
    pub bids_root: PathBuf,
    pub mapping_file: PathBuf,
    pub processing_log: PathBuf,
    pub discovered: usize,
    /// Resolved subjects, parallel to `report.results`.
    pub subjects: Vec<SubjectRecord>,
    pub report: BatchReport,
}

impl RunSummary {
    pub fn has_failures(&self) -> bool {
        self.report.has_failures()
    }
}

/// Runs the whole pipeline with `converter`.
///
/// Errors are fatal: a bad configuration or unreadable search root aborts
/// before any subject is touched and no mapping is written; a mapping write
/// failure is reported after conversion has finished. Per-subject failures
/// are never errors here, they are in the returned report.
pub fn run(config: &PipelineConfig, converter: &dyn RecordingConverter) -> Result<RunSummary> {
    let started_at = Utc::now();
    let search_root = config.search_root()?.to_path_buf();
    let bids_root = config.bids_root()?;
    let mapping_file = config.mapping_file()?;
    let run_span = info_span!("run", search_root = %search_root.display());
    let _run_guard = run_span.enter();

    let pattern: NamePattern = config.pattern.parse().context("parse name pattern")?;
    let rule = config.naming.build().context("build naming rule")?;

    // =========================================================================
    // Stage 1: Discovery
    // =========================================================================
    // The BIDS root may sit inside the search root; its contents are never input.
    let discovery_start = Instant::now();
    let excluded = [bids_root.clone()];
    let discovered = discover_recordings_excluding(&search_root, &pattern, &excluded)
        .with_context(|| format!("discover recordings under {}", search_root.display()))?;
    info!(
        pattern = %pattern,
        count = discovered.len(),
        duration_ms = discovery_start.elapsed().as_millis(),
        "discovery complete"
    );

    // =========================================================================
    // Stage 2: Subject resolution
    // =========================================================================
    let resolution = resolve_subjects(&discovered, rule.as_ref());
    info!(
        subjects = resolution.subjects.len(),
        recordings = resolution.recording_count(),
        skipped = resolution.warnings.len(),
        "subjects resolved"
    );
    let mut log = ProcessingLog::new();
    for warning in resolution.warnings {
        log.warn(warning);
    }
    if resolution.subjects.is_empty() {
        info!("nothing to process");
    }

    // =========================================================================
    // Stage 3: Per-subject conversion
    // =========================================================================
    let options = SubjectOptions {
        layout: BidsLayout::new(&bids_root),
        task: config.task.clone(),
        format: config.format.clone(),
        anonymize: config.anonymize,
        anatomy: config.anatomy.clone(),
        require_anatomy: config.require_anatomy,
    };
    let convert_start = Instant::now();
    let report = run_batch(&resolution.subjects, converter, &options, log);
    info!(
        subjects = report.results.len(),
        failed = report.failure_count(),
        converter = converter.name(),
        duration_ms = convert_start.elapsed().as_millis(),
        "conversion complete"
    );

    // =========================================================================
    // Stage 4: Outputs
    // =========================================================================
    let mapping_written = write_mapping(&report.mapping, &mapping_file);

    let mode = if config.overwrite_log {
        LogWriteMode::Overwrite
    } else {
        LogWriteMode::Append
    };
    if let Err(e) = write_processing_log(&report.log, &config.processing_log, mode, started_at) {
        error!(error = %e, "processing log could not be written");
    }

    mapping_written.with_context(|| {
        format!(
            "conversion finished for {} subjects but the mapping could not be written to {}",
            report.results.len(),
            mapping_file.display()
        )
    })?;

    Ok(RunSummary {
        search_root,
        bids_root,
        mapping_file,
        processing_log: config.processing_log.clone(),
        discovered: discovered.len(),
        subjects: resolution.subjects,
        report,
    })
}
