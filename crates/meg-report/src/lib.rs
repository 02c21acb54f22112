//! Durable outputs of a batch run: the subject mapping CSV and the
//! processing log.

mod atomic;
pub mod error;
pub mod log;
pub mod mapping;

pub use error::{LogWriteError, MappingReadError, MappingWriteError};
pub use log::{LogWriteMode, render_processing_log, write_processing_log};
pub use mapping::{MAPPING_HEADER, read_mapping, write_mapping};
