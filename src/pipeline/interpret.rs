//! Response interpretation — untrusted model output to `CandidateRecord`.
//!
//! Model completions are adversarial input, not a typed object: prose around
//! the JSON, single-quoted pseudo-JSON, or no JSON at all are all expected.
//! Interpretation is a parse-with-repair-then-fallback pipeline that never
//! returns an error; "nothing usable" is the empty record and the
//! normalizer fills in sentinels downstream.

use serde_json::Value;
use tracing::debug;

use crate::pipeline::types::CandidateRecord;

/// Interpret raw completion text as a candidate record.
///
/// Takes the span from the first `{` to the first `}` and parses it as
/// JSON, retrying once with single quotes replaced by double quotes. The
/// span is not brace-balanced: a nested object ends the span at the inner
/// closing brace and the parse falls through to empty.
pub fn interpret(raw: &str) -> CandidateRecord {
    let Some(start) = raw.find('{') else {
        return CandidateRecord::empty();
    };
    let Some(end) = raw.find('}') else {
        return CandidateRecord::empty();
    };
    if end < start {
        return CandidateRecord::empty();
    }

    let span = &raw[start..=end];
    match serde_json::from_str::<Value>(span) {
        Ok(Value::Object(map)) => CandidateRecord::from_map(map),
        Ok(_) => CandidateRecord::empty(),
        Err(first_err) => {
            // One repair pass: models frequently emit single-quoted JSON.
            let repaired = span.replace('\'', "\"");
            match serde_json::from_str::<Value>(&repaired) {
                Ok(Value::Object(map)) => {
                    debug!("recovered candidate record via quote repair");
                    CandidateRecord::from_map(map)
                }
                _ => {
                    debug!(error = %first_err, "no parseable object in completion");
                    CandidateRecord::empty()
                }
            }
        }
    }
}
