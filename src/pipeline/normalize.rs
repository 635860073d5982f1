//! Record normalization — candidate to fully populated record.

use std::collections::HashMap;

use serde_json::Value;

use crate::pipeline::types::{CandidateRecord, NormalizedRecord};
use crate::schema::{NOT_FOUND, Schema};

/// Normalize a candidate against the schema.
///
/// Total over any candidate, including the empty one: every schema field
/// gets a value, and no value is ever null or empty. Keys the schema does
/// not define are dropped. Downstream consumers never see missing cells.
pub fn normalize(candidate: &CandidateRecord, schema: &Schema) -> NormalizedRecord {
    let mut values = HashMap::with_capacity(schema.len());
    for name in schema.field_names() {
        let value = match candidate.get(name) {
            None | Some(Value::Null) => NOT_FOUND.to_string(),
            Some(Value::Array(items)) => {
                let joined = items
                    .iter()
                    .map(value_to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                if joined.trim().is_empty() {
                    NOT_FOUND.to_string()
                } else {
                    joined
                }
            }
            Some(other) => {
                let text = value_to_string(other);
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    NOT_FOUND.to_string()
                } else {
                    trimmed.to_string()
                }
            }
        };
        values.insert(name.to_string(), value);
    }
    NormalizedRecord::new(values)
}

/// Stringify a JSON value the way a cell expects: strings unquoted,
/// everything else in its JSON rendering.
fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
