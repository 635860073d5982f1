//! Email sources — `.eml` discovery and text extraction.
//!
//! Adapted from the email channel's mail-parser handling: plain-text parts
//! are taken as-is, HTML parts are stripped to text, and the result is
//! concatenated with each line trimmed. Extraction never fails on content —
//! a message with nothing readable yields an empty string, which the
//! orchestrator treats as a recoverable per-item condition.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use mail_parser::MessageParser;
use serde::Serialize;
use uuid::Uuid;

use crate::error::SourceError;

/// A loaded email, ready for extraction.
#[derive(Debug, Clone, Serialize)]
pub struct EmailDocument {
    /// RFC Message-ID, or a generated id when the header is absent.
    pub id: String,
    /// Where the message was read from.
    pub path: PathBuf,
    pub subject: Option<String>,
    pub date: Option<DateTime<Utc>>,
    /// Extracted plain text. Empty when the message has no readable parts.
    pub text: String,
}

/// Collect `.eml` sources from an input path.
///
/// A directory yields its `.eml` files sorted by name; a single file must
/// carry the `.eml` extension. Anything else is a fatal input error.
pub fn collect_sources(input: &Path) -> Result<Vec<PathBuf>, SourceError> {
    if input.is_dir() {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(input)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| p.is_file() && has_eml_extension(p))
            .collect();
        paths.sort();
        if paths.is_empty() {
            return Err(SourceError::NoSources {
                path: input.to_path_buf(),
            });
        }
        Ok(paths)
    } else if input.is_file() && has_eml_extension(input) {
        Ok(vec![input.to_path_buf()])
    } else {
        Err(SourceError::InvalidInput {
            path: input.to_path_buf(),
        })
    }
}

fn has_eml_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("eml"))
}

/// Load and parse one `.eml` file.
pub fn load_document(path: &Path) -> Result<EmailDocument, SourceError> {
    let bytes = std::fs::read(path).map_err(|e| SourceError::Unreadable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let parsed = MessageParser::default()
        .parse(&bytes)
        .ok_or_else(|| SourceError::Unparseable {
            path: path.to_path_buf(),
        })?;

    let id = parsed
        .message_id()
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("gen-{}", Uuid::new_v4()));
    let subject = parsed.subject().map(|s| s.to_string());
    let date = parsed
        .date()
        .and_then(|d| DateTime::from_timestamp(d.to_timestamp(), 0));
    let text = extract_text(&parsed);

    Ok(EmailDocument {
        id,
        path: path.to_path_buf(),
        subject,
        date,
        text,
    })
}

/// Extract readable text from a parsed email.
///
/// Concatenates every plain-text part; when none exist, falls back to the
/// HTML parts stripped to text. Lines are right-trimmed and blank parts
/// dropped.
fn extract_text(parsed: &mail_parser::Message) -> String {
    let mut parts: Vec<String> = Vec::new();

    let mut index = 0;
    while let Some(text) = parsed.body_text(index) {
        parts.push(text.to_string());
        index += 1;
    }

    if parts.is_empty() {
        let mut index = 0;
        while let Some(html) = parsed.body_html(index) {
            parts.push(strip_html(html.as_ref()));
            index += 1;
        }
    }

    let joined = parts
        .iter()
        .filter(|p| !p.trim().is_empty())
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    joined
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Strip HTML tags from content (basic).
pub fn strip_html(html: &str) -> String {
    let mut result = String::new();
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(ch),
            _ => {}
        }
    }
    // Normalize whitespace
    result.split_whitespace().collect::<Vec<_>>().join(" ")
}
