use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use roster_extract::config::RunConfig;
use roster_extract::llm::{LlmConfig, create_provider};
use roster_extract::pipeline::RosterPipeline;
use roster_extract::schema::{HeaderMapping, Schema};
use roster_extract::sink::CsvSink;
use roster_extract::source;

/// Parse roster emails and export them to a templated table.
#[derive(Parser)]
#[command(name = "roster-extract", version)]
struct Cli {
    /// Path to a single .eml file or a directory containing .eml files
    eml_input: PathBuf,

    /// Template file whose header row defines the output columns
    template: PathBuf,

    /// Path for the output file
    output: PathBuf,

    /// Enable detailed logs for debugging
    #[arg(short, long)]
    verbose: bool,

    /// Number of emails to group per progress batch
    #[arg(short, long, default_value_t = 1)]
    batch: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = RunConfig {
        input: cli.eml_input,
        template: cli.template,
        output: cli.output,
        batch_size: cli.batch,
        verbose: cli.verbose,
    };

    let default_filter = if config.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .init();

    let sources = source::collect_sources(&config.input)?;
    info!(count = sources.len(), "found email sources");

    let llm_config = LlmConfig::from_env()?;
    let llm = create_provider(&llm_config)?;

    let mut sink = CsvSink::create(&config.template, &config.output)?;

    let pipeline = RosterPipeline::new(
        llm,
        Schema::provider_roster(),
        HeaderMapping::provider_roster(),
    );
    let summary = pipeline
        .run(&sources, &mut sink, config.batch_size)
        .await?;

    info!(
        total = summary.total,
        rows = summary.rows_written,
        skipped = summary.skipped,
        output = %config.output.display(),
        "run complete"
    );
    Ok(())
}
