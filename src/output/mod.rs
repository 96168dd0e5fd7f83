//! Output generation for harvest results
//!
//! The record set is persisted as CSV (the one-record-one-row boundary the
//! downstream analysis consumes) and the run is summarized on stdout.

mod csv;
mod stats;

pub use csv::{format_csv, write_csv};
pub use stats::{print_summary, HarvestSummary};
