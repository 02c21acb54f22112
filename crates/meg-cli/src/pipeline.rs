//! Batch driver: one isolated conversion attempt per subject.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use meg_bids::{RecordingConverter, SubjectOptions, convert_subject};
use meg_model::{ConversionResult, ProcessingLog, SubjectMappingEntry, SubjectRecord};
use tracing::{error, info, info_span};

/// Everything a batch produced, in subject order.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub results: Vec<ConversionResult>,
    pub mapping: Vec<SubjectMappingEntry>,
    pub log: ProcessingLog,
}

impl BatchReport {
    pub fn failed(&self) -> impl Iterator<Item = &ConversionResult> {
        self.results.iter().filter(|r| !r.is_success())
    }

    pub fn failure_count(&self) -> usize {
        self.failed().count()
    }

    pub fn has_failures(&self) -> bool {
        self.failed().next().is_some()
    }
}

/// Converts `subjects` in order, numbering them from 1.
///
/// Every subject gets a mapping entry whether or not its conversion
/// succeeded, so a failed subject can be rerun later under the same number.
/// Failures, including panics inside the converter, are recorded and the
/// batch moves on. `log` usually arrives holding discovery warnings.
pub fn run_batch(
    subjects: &[SubjectRecord],
    converter: &dyn RecordingConverter,
    options: &SubjectOptions,
    mut log: ProcessingLog,
) -> BatchReport {
    let mut results = Vec::with_capacity(subjects.len());
    let mut mapping = Vec::with_capacity(subjects.len());
    let mut next_number: u32 = 1;

    for record in subjects {
        let number = next_number;
        next_number += 1;
        let span = info_span!("subject", subject = %record.name, number);
        let _guard = span.enter();

        let result = attempt(record, number, converter, options);
        match result.error() {
            None => info!(outputs = result.outputs.len(), "subject converted"),
            Some(cause) => error!(
                cause,
                partial_outputs = ?result.outputs,
                "subject failed"
            ),
        }
        log.record(&result);
        mapping.push(SubjectMappingEntry::new(record.name.clone(), number));
        results.push(result);
    }

    BatchReport {
        results,
        mapping,
        log,
    }
}

fn attempt(
    record: &SubjectRecord,
    number: u32,
    converter: &dyn RecordingConverter,
    options: &SubjectOptions,
) -> ConversionResult {
    panic::catch_unwind(AssertUnwindSafe(|| {
        convert_subject(record, number, converter, options)
    }))
    .unwrap_or_else(|payload| {
        ConversionResult::failed(
            record.name.clone(),
            number,
            format!("converter panicked: {}", panic_message(payload.as_ref())),
            Vec::new(),
        )
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}
