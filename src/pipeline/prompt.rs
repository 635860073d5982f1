//! Prompt construction for the extraction call.

use serde_json::Value;

use crate::schema::{NOT_FOUND, Schema};

/// Build the extraction prompt for one email.
///
/// Deterministic given identical inputs: the schema renders in field order
/// and the email text is embedded verbatim, delimited by triple quotes so
/// the model cannot confuse it with the instructions. Callers wanting to
/// bound prompt size must truncate the email text upstream.
pub fn build_prompt(email_text: &str, schema: &Schema) -> String {
    let schema_block = render_schema(schema);

    format!(
        "You are a structured-extraction engine. Extract values from the EMAIL below and \
         return STRICT JSON only (no commentary).\n\
         If a value cannot be found, set it exactly to \"{NOT_FOUND}\".\n\
         Dates must be normalized to MM/DD/YYYY when possible.\n\
         Return a JSON object with the following keys and value formats (exact keys must be used):\n\
         \n\
         {schema_block}\n\
         \n\
         Email:\n\
         \"\"\"{email_text}\"\"\"\n\
         \n\
         IMPORTANT: Return only valid JSON (a single JSON object) and nothing else."
    )
}

/// Render the schema as an indented JSON object in field order.
///
/// Hand-rendered rather than serialized through a map so the key order is
/// the schema's, with `serde_json` handling string escaping.
fn render_schema(schema: &Schema) -> String {
    let mut out = String::from("{\n");
    let count = schema.len();
    for (index, field) in schema.fields().iter().enumerate() {
        let key = Value::String(field.name.to_string());
        let format = Value::String(field.format.to_string());
        out.push_str(&format!("  {key}: {format}"));
        if index + 1 < count {
            out.push(',');
        }
        out.push('\n');
    }
    out.push('}');
    out
}
