//! Shared data model for the MEG-to-BIDS batch converter.

pub mod conversion;
pub mod log;
pub mod mapping;
pub mod recording;

pub use conversion::{ConversionResult, Outcome};
pub use log::{LogEntry, LogLevel, ProcessingLog};
pub use mapping::SubjectMappingEntry;
pub use recording::{RawRecordingDirectory, SubjectRecord};
