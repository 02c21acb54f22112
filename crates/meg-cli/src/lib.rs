//! Library components of the `meg2bids` command.

pub mod config;
pub mod logging;
pub mod pipeline;
pub mod run;
