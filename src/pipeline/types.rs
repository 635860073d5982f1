//! Shared types for the extraction pipeline.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value};

/// Best-effort structured parse of generated text.
///
/// May be incomplete, may carry keys outside the schema, may be empty when
/// the model produced nothing usable. Never null — "no structured output"
/// is the empty record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateRecord {
    fields: Map<String, Value>,
}

impl CandidateRecord {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

/// Fully populated record: one single-line string per schema field.
///
/// Invariant: the key set equals the schema's field set, and no value is
/// empty — anything unresolvable holds the not-found sentinel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRecord {
    values: HashMap<String, String>,
}

impl NormalizedRecord {
    pub(crate) fn new(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

/// One output row, aligned 1:1 with the sink's header row.
pub type OutputRow = Vec<String>;

/// End-of-run accounting.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct BatchSummary {
    /// Emails offered to the pipeline.
    pub total: usize,
    /// Rows appended to the sink.
    pub rows_written: usize,
    /// Per-item recoverable failures (unreadable, empty, completion error).
    pub skipped: usize,
}
