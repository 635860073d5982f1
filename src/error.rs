//! Error types for roster-extract.

use std::path::PathBuf;

/// Top-level error type for the extraction pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Email source errors.
///
/// `Unreadable` and `Unparseable` are recoverable per item: the
/// orchestrator logs and skips. `InvalidInput` and `NoSources` are fatal
/// at the CLI boundary, there is nothing to run against.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Cannot read email source {path}: {reason}")]
    Unreadable { path: PathBuf, reason: String },

    #[error("Not a parseable email message: {path}")]
    Unparseable { path: PathBuf },

    #[error("Input must be an .eml file or a directory containing .eml files: {path}")]
    InvalidInput { path: PathBuf },

    #[error("No .eml files found in {path}")]
    NoSources { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// LLM provider errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },
}

/// Tabular sink errors. All fatal: once an append fails, row order and
/// header alignment can no longer be guaranteed to the persisted document.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("Cannot read template {path}: {reason}")]
    Template { path: PathBuf, reason: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for the pipeline.
pub type Result<T> = std::result::Result<T, Error>;
