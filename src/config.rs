//! Run configuration.

use std::path::PathBuf;

/// Settings for one extraction run, assembled from CLI arguments.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// A single `.eml` file or a directory of `.eml` files.
    pub input: PathBuf,
    /// Template whose header row defines the output columns.
    pub template: PathBuf,
    /// Destination for the output table.
    pub output: PathBuf,
    /// Emails per progress batch. Grouping only — processing stays
    /// strictly sequential.
    pub batch_size: usize,
    /// Raise log verbosity to debug.
    pub verbose: bool,
}
