//! Conversion of one subject's MEG recordings into the BIDS layout.
//!
//! The format conversion itself is external: callers supply a
//! [`RecordingConverter`]. This crate owns the output layout, the anatomy
//! association rule, and the per-subject failure boundary.

pub mod anatomy;
pub mod command;
pub mod converter;
pub mod error;
pub mod layout;
pub mod subject;

pub use anatomy::{AnatomyFiles, AnatomyRule};
pub use command::CommandConverter;
pub use converter::{ConversionRequest, RecordingConverter};
pub use error::{ConvertError, Result};
pub use layout::BidsLayout;
pub use subject::{SubjectOptions, convert_subject};
