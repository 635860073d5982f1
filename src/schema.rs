//! The extraction target: field schema and output header mapping.
//!
//! Both are process-wide immutable values, constructed once at startup and
//! passed explicitly into the pipeline. The schema defines the JSON keys the
//! model must return; the header mapping ties an external template's column
//! labels back to those keys.

use std::collections::HashMap;

/// Literal value standing in for "no value could be determined".
///
/// The prompt instructs the model to emit it, the normalizer substitutes it
/// for anything absent or empty, and the row mapper emits it for columns it
/// cannot resolve. Downstream consumers never see an empty cell.
pub const NOT_FOUND: &str = "Information not found";

/// A single schema field: its JSON key and the value-format description
/// shown to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub format: &'static str,
}

/// Ordered set of fields the model must populate.
///
/// Order matters only for prompt rendering (stable prompts, stable caching
/// behavior upstream); membership is what the normalizer enforces.
#[derive(Debug, Clone)]
pub struct Schema {
    fields: Vec<FieldSpec>,
}

impl Schema {
    /// The provider-roster schema: one row per roster transaction.
    pub fn provider_roster() -> Self {
        Self {
            fields: vec![
                FieldSpec {
                    name: "transaction_type",
                    format: "Add | Update | Term | Information not found",
                },
                FieldSpec {
                    name: "transaction_attribute",
                    format: "string or 'Information not found'",
                },
                FieldSpec {
                    name: "effective_date",
                    format: "MM/DD/YYYY or 'Information not found'",
                },
                FieldSpec {
                    name: "term_date",
                    format: "MM/DD/YYYY or 'Information not found'",
                },
                FieldSpec {
                    name: "term_reason",
                    format: "string or 'Information not found'",
                },
                FieldSpec {
                    name: "provider_name",
                    format: "string or 'Information not found' Only output the name not their designation",
                },
                FieldSpec {
                    name: "provider_npi",
                    format: "digits or 'Information not found'",
                },
                FieldSpec {
                    name: "provider_specialty",
                    format: "string or 'Information not found'",
                },
                FieldSpec {
                    name: "state_license",
                    format: "string or 'Information not found'",
                },
                FieldSpec {
                    name: "organization_name",
                    format: "string or 'Information not found'",
                },
                FieldSpec {
                    name: "tin",
                    format: "digits or 'Information not found'(It is the Tax Id No.)",
                },
                FieldSpec {
                    name: "group_npi",
                    format: "digits or 'Information not found' (It is NPI of Default Provider)",
                },
                FieldSpec {
                    name: "complete_address",
                    format: "string or 'Information not found'",
                },
                FieldSpec {
                    name: "phone_number",
                    format: "digits or 'Information not found'",
                },
                FieldSpec {
                    name: "fax_number",
                    format: "digits or 'Information not found'",
                },
                FieldSpec {
                    name: "ppg_id",
                    format: "string (single or comma-separated) or 'Information not found'",
                },
                FieldSpec {
                    name: "line_of_business",
                    format: "'Medicare' or 'Commercial' or 'Medical' or 'Information not found'  Only these strings should be the output",
                },
            ],
        }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Correspondence between an external template's column labels and schema
/// field names. Headers the mapping doesn't recognize resolve to `None`
/// and render as [`NOT_FOUND`] in output rows.
#[derive(Debug, Clone)]
pub struct HeaderMapping {
    entries: HashMap<&'static str, &'static str>,
}

impl HeaderMapping {
    /// Mapping for the provider-roster template headers.
    pub fn provider_roster() -> Self {
        let entries = HashMap::from([
            ("Transaction Type (Add/Update/Term)", "transaction_type"),
            ("Transaction Attribute", "transaction_attribute"),
            ("Effective Date", "effective_date"),
            ("Term Date", "term_date"),
            ("Term Reason", "term_reason"),
            ("Provider Name", "provider_name"),
            ("Provider NPI", "provider_npi"),
            ("Provider Specialty", "provider_specialty"),
            ("State License", "state_license"),
            ("Organization Name", "organization_name"),
            ("TIN", "tin"),
            ("Group NPI", "group_npi"),
            ("Complete Address", "complete_address"),
            ("Phone Number", "phone_number"),
            ("Fax Number", "fax_number"),
            ("PPG ID", "ppg_id"),
            (
                "Line Of Business (Medicare/Commercial/Medical)",
                "line_of_business",
            ),
        ]);
        Self { entries }
    }

    /// Resolve an external header label to a schema field name.
    pub fn resolve(&self, header: &str) -> Option<&'static str> {
        self.entries.get(header).copied()
    }
}
