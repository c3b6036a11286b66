//! The curation pipeline.
//!
//! A run is a strict linear pass: aggregate candidates from the sources,
//! resolve duplicate identities, enrich, score, rank, and assemble the
//! similarity link graph. Stages communicate only through their outputs, so
//! a run is deterministic for a fixed candidate set and configuration.

mod aggregate;
mod classify;
mod enrich;
mod graph;
mod rank;
mod score;

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::error::PipelineResult;
use crate::ident::IdentityResolver;
use crate::models::{AggregationStats, CitationImpact, PipelineReport, RankedPaper, RelevanceTier};
use crate::sources::{SourceAdapter, YearRange, default_adapters};

pub use aggregate::Aggregator;
pub use classify::Classifier;
pub use enrich::{Enricher, KeywordExtractor};
pub use graph::{LinkGraph, LinkGraphBuilder};
pub use rank::Ranker;
pub use score::{ScoredPaper, Scorer};

/// Per-run overrides on top of the configuration defaults.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Maximum ranked papers to return.
    pub max_results: Option<usize>,

    /// Inclusive publication-year window.
    pub year_range: Option<YearRange>,

    /// Restrict the run to these sources, in the given order.
    pub sources: Option<Vec<String>>,
}

/// The assembled curation pipeline.
pub struct Pipeline {
    config: Config,
    aggregator: Aggregator,
    scorer: Scorer,
    ranker: Ranker,
    classifier: Classifier,
    graph_builder: LinkGraphBuilder,
    enrichers: Vec<Arc<dyn Enricher>>,
}

impl Pipeline {
    /// Build a pipeline with the default source adapters.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration fails validation or an HTTP
    /// client cannot be constructed.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let adapters = default_adapters(&config)?;
        Ok(Self::with_adapters(config, adapters)?)
    }

    /// Build a pipeline over a custom adapter set.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::PipelineError::InvalidConfig`] when the
    /// configuration fails validation.
    pub fn with_adapters(
        config: Config,
        adapters: Vec<Arc<dyn SourceAdapter>>,
    ) -> PipelineResult<Self> {
        config.validate()?;

        let keyword_extractor: Arc<dyn Enricher> = Arc::new(KeywordExtractor::from_config(&config));

        Ok(Self {
            aggregator: Aggregator::new(adapters, &config),
            scorer: Scorer::new(&config),
            ranker: Ranker::new(&config),
            classifier: Classifier::new(&config),
            graph_builder: LinkGraphBuilder::new(&config),
            enrichers: vec![keyword_extractor],
            config,
        })
    }

    /// Register an additional enricher; enrichers run in registration order.
    #[must_use]
    pub fn with_enricher(mut self, enricher: Arc<dyn Enricher>) -> Self {
        self.enrichers.push(enricher);
        self
    }

    /// Swap the scorer, typically to fix its clock in tests.
    #[must_use]
    pub fn with_scorer(mut self, scorer: Scorer) -> Self {
        self.scorer = scorer;
        self
    }

    /// Execute one curation run.
    ///
    /// Source failures degrade to statistics; a run over a query no source
    /// can answer yields an empty report, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error when a pipeline stage fails fatally.
    pub async fn run(&self, query: &str, options: &RunOptions) -> PipelineResult<PipelineReport> {
        let run_id = Uuid::new_v4().to_string();
        let max_results = options.max_results.unwrap_or(self.config.max_results);

        info!(run_id = %run_id, query, max_results, "starting curation run");

        let (candidates, stats) = self
            .aggregator
            .search(query, max_results, options.year_range, options.sources.as_deref())
            .await;

        if candidates.is_empty() {
            if stats.all_failed() {
                warn!(run_id = %run_id, "every source failed, returning empty report");
            }
            return Ok(self.empty_report(run_id, query, stats));
        }

        let resolution =
            IdentityResolver::new(self.config.fuzzy_title_threshold).resolve(candidates);
        let resolved = resolution.papers.len();
        let ambiguous = resolution.ambiguous;

        let mut papers = resolution.papers;
        for enricher in &self.enrichers {
            if let Err(err) = enricher.enrich(&mut papers).await {
                warn!(enricher = enricher.name(), error = %err, "enrichment failed, continuing");
            }
        }

        let scored = self.scorer.score_all(papers);
        let ranked = self.ranker.rank(scored, max_results);
        let graph = self.graph_builder.build(&ranked);

        let papers: Vec<RankedPaper> = ranked
            .into_iter()
            .map(|entry| {
                let categories =
                    graph.categories.get(&entry.paper.id).cloned().unwrap_or_default();
                RankedPaper {
                    relevance_tier: RelevanceTier::from_score(entry.score.value),
                    citation_impact: CitationImpact::from_count(entry.paper.citation_count),
                    venue_tier: self.scorer.venue_tier(&entry.paper),
                    categories,
                    methodologies: self.classifier.methodologies(&entry.paper),
                    application_domains: self.classifier.domains(&entry.paper),
                    completeness: entry.paper.completeness(),
                    paper: entry.paper,
                    score: entry.score,
                }
            })
            .collect();

        let report = PipelineReport {
            run_id,
            generated_at: Utc::now(),
            query: query.to_string(),
            stats,
            resolved,
            ambiguous,
            papers,
            edges: graph.edges,
            related: graph.related,
            categories: graph.categories,
        };

        info!(
            run_id = %report.run_id,
            resolved,
            ranked = report.papers.len(),
            edges = report.edges.len(),
            "curation run finished"
        );

        Ok(report)
    }

    fn empty_report(
        &self,
        run_id: String,
        query: &str,
        stats: AggregationStats,
    ) -> PipelineReport {
        PipelineReport {
            run_id,
            generated_at: Utc::now(),
            query: query.to_string(),
            stats,
            resolved: 0,
            ambiguous: 0,
            papers: Vec::new(),
            edges: Vec::new(),
            related: std::collections::BTreeMap::new(),
            categories: std::collections::BTreeMap::new(),
        }
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline").field("enrichers", &self.enrichers.len()).finish()
    }
}
