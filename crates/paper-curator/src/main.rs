//! PHM Paper Curator - batch CLI.
//!
//! Runs one curation pass for a query and prints (or writes) the report.

use std::path::PathBuf;

use chrono::{Datelike, Utc};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use paper_curator::formatters::{compact_report, export_references, format_report_markdown};
use paper_curator::models::{ExportFormat, OutputFormat};
use paper_curator::{Config, Pipeline, RunOptions};

#[derive(Parser, Debug)]
#[command(name = "paper-curator")]
#[command(about = "Batch literature curation for PHM research")]
#[command(version)]
struct Cli {
    /// Search query
    query: String,

    /// Maximum ranked papers to keep
    #[arg(long)]
    max_results: Option<usize>,

    /// Earliest publication year
    #[arg(long)]
    year_start: Option<i32>,

    /// Latest publication year
    #[arg(long)]
    year_end: Option<i32>,

    /// Restrict the run to these sources, in order (e.g. openalex,crossref)
    #[arg(long, value_delimiter = ',')]
    sources: Option<Vec<String>>,

    /// Minimum composite score for the ranked list
    #[arg(long)]
    min_score: Option<f64>,

    /// Report format
    #[arg(long, default_value = "markdown")]
    format: OutputFormat,

    /// Write a reference export instead of a report
    #[arg(long)]
    export: Option<ExportFormat>,

    /// Skip abstracts in reference exports
    #[arg(long)]
    no_abstract: bool,

    /// Write output to this file instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Semantic Scholar API key (optional, enables higher rate limits)
    #[arg(long, env = "SEMANTIC_SCHOLAR_API_KEY")]
    api_key: Option<String>,

    /// Contact email for polite API pools
    #[arg(long, env = "CURATOR_MAILTO")]
    mailto: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    // Logs go to stderr so reports on stdout stay parseable.
    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting paper-curator");

    let mut config = Config::new(cli.api_key, cli.mailto);
    if let Some(min_score) = cli.min_score {
        config.min_composite_score = min_score;
    }

    let pipeline = Pipeline::new(config)?;

    let year_range = match (cli.year_start, cli.year_end) {
        (None, None) => None,
        (start, end) => {
            Some((start.unwrap_or(1900), end.unwrap_or_else(|| Utc::now().year())))
        }
    };

    let options =
        RunOptions { max_results: cli.max_results, year_range, sources: cli.sources };

    let report = pipeline.run(&cli.query, &options).await?;

    let rendered = if let Some(format) = cli.export {
        export_references(&report.papers, format, !cli.no_abstract)
    } else if cli.format.is_json() {
        serde_json::to_string_pretty(&compact_report(&report))?
    } else {
        format_report_markdown(&report)
    };

    match cli.output {
        Some(path) => {
            std::fs::write(&path, &rendered)?;
            tracing::info!(path = %path.display(), bytes = rendered.len(), "Report written");
        }
        None => println!("{rendered}"),
    }

    Ok(())
}
