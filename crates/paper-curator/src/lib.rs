//! PHM Paper Curator
//!
//! A literature curation engine for prognostics and health management (PHM)
//! research. Aggregates candidate records from scholarly APIs, resolves
//! duplicate identities across sources, scores and ranks papers, and builds a
//! similarity link graph for knowledge-base navigation.
//!
//! # Features
//!
//! - **Multi-source aggregation**: OpenAlex, Crossref, and Semantic Scholar
//!   adapters behind one trait, queried in priority order
//! - **Identity resolution**: DOI, arXiv, and title-fingerprint matching with
//!   conflict detection for ambiguous merges
//! - **Relevance ranking**: weighted concept, citation, recency, and venue
//!   scoring with a full per-paper breakdown
//! - **Link graph**: Jaccard similarity edges, category assignment, and
//!   top-K related-paper lists
//!
//! # Example
//!
//! ```no_run
//! use paper_curator::{Config, Pipeline, RunOptions};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let pipeline = Pipeline::new(config)?;
//!
//!     let report = pipeline.run("bearing fault diagnosis", &RunOptions::default()).await?;
//!     println!("{}", paper_curator::formatters::format_report_markdown(&report));
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod formatters;
pub mod ident;
pub mod models;
pub mod pipeline;
pub mod sources;
pub mod tables;

pub use config::Config;
pub use error::{PipelineError, SourceError};
pub use models::PipelineReport;
pub use pipeline::{Pipeline, RunOptions};
