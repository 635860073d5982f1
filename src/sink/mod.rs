//! Tabular output sink.
//!
//! The pipeline writes rows through this seam; the contract is a header row
//! read once at run start, one appended row per email in input order, and a
//! final persist. The production implementation is CSV-backed.

mod csv_sink;

pub use csv_sink::CsvSink;

use crate::error::SinkError;

/// Append-only tabular sink with a fixed header contract.
pub trait TabularSink: Send {
    /// The header row. Read once at orchestration start; never changes
    /// mid-batch.
    fn headers(&self) -> &[String];

    /// Append exactly one row. Prior rows are never disturbed.
    fn append_row(&mut self, row: &[String]) -> Result<(), SinkError>;

    /// Flush everything written so far to the destination.
    fn persist(&mut self) -> Result<(), SinkError>;
}
