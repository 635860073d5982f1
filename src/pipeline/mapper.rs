//! Row projection — normalized record to the sink's column order.

use crate::pipeline::types::{NormalizedRecord, OutputRow};
use crate::schema::{HeaderMapping, NOT_FOUND};

/// Project a normalized record into the external header order.
///
/// One cell per header, in header order: a resolved header emits the
/// record's value for that field, an unrecognized header emits the
/// sentinel. Never reorders, drops, or fails — output length always
/// equals header count.
pub fn project_row(
    record: &NormalizedRecord,
    headers: &[String],
    mapping: &HeaderMapping,
) -> OutputRow {
    headers
        .iter()
        .map(|header| match mapping.resolve(header) {
            Some(field) => record.get(field).unwrap_or(NOT_FOUND).to_string(),
            None => NOT_FOUND.to_string(),
        })
        .collect()
}
