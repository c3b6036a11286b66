//! Source adapters for bibliographic metadata providers.
//!
//! Each adapter wraps one upstream API and maps its responses into
//! [`CandidateRecord`]s. Adapters are otherwise interchangeable behind the
//! [`SourceAdapter`] trait, which is what the aggregation stage consumes.

mod crossref;
mod http;
mod openalex;
mod semantic_scholar;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::Config;
use crate::error::SourceResult;
use crate::models::CandidateRecord;

pub use crossref::CrossrefAdapter;
pub use http::HttpClient;
pub use openalex::OpenAlexAdapter;
pub use semantic_scholar::SemanticScholarAdapter;

/// Inclusive publication-year range, `(start, end)`.
pub type YearRange = (i32, i32);

/// A searchable bibliographic source.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Stable source name used for priority lookup and statistics.
    fn name(&self) -> &'static str;

    /// Search the source for records matching `query`.
    ///
    /// Returns at most `limit` records. When `year_range` is set, results are
    /// restricted to the inclusive publication-year window.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    async fn search(
        &self,
        query: &str,
        limit: usize,
        year_range: Option<YearRange>,
    ) -> SourceResult<Vec<CandidateRecord>>;
}

/// Construct the default adapter set from configuration.
///
/// # Errors
///
/// Returns an error if HTTP client initialization fails.
pub fn default_adapters(config: &Config) -> anyhow::Result<Vec<Arc<dyn SourceAdapter>>> {
    Ok(vec![
        Arc::new(OpenAlexAdapter::new(config)?),
        Arc::new(CrossrefAdapter::new(config)?),
        Arc::new(SemanticScholarAdapter::new(config)?),
    ])
}
