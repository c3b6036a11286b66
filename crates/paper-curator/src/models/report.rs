//! Batch report types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::graph::SimilarityEdge;
use super::paper::CanonicalPaper;
use super::score::{CitationImpact, CompositeScore, RelevanceTier};
use crate::tables::VenueTier;

/// Per-source aggregation counters.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceStats {
    /// Requests attempted, including retries.
    pub requests: u32,

    /// Successful adapter calls.
    pub successes: u32,

    /// Failed adapter calls (errors and timeouts).
    pub failures: u32,

    /// Candidate records returned.
    pub records_found: u32,
}

/// Aggregation outcome across all sources.
///
/// `BTreeMap` keeps serialized stats in a stable order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationStats {
    /// Per-source counters, keyed by source name.
    #[serde(default)]
    pub sources: BTreeMap<String, SourceStats>,

    /// Candidates that passed ingestion validation.
    pub candidates: usize,

    /// Candidates dropped by ingestion validation.
    pub dropped_invalid: usize,

    /// True when aggregation stopped early at the oversample bound.
    pub terminated_early: bool,
}

impl AggregationStats {
    /// Mutable counters for one source, created on first touch.
    pub fn source_mut(&mut self, name: &str) -> &mut SourceStats {
        self.sources.entry(name.to_string()).or_default()
    }

    /// True when at least one source was queried and none succeeded.
    #[must_use]
    pub fn all_failed(&self) -> bool {
        !self.sources.is_empty() && self.sources.values().all(|s| s.successes == 0)
    }
}

/// One ranked paper with its scores and tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedPaper {
    /// The canonical paper.
    pub paper: CanonicalPaper,

    /// Composite score with breakdown.
    pub score: CompositeScore,

    /// Relevance tier for the composite value.
    pub relevance_tier: RelevanceTier,

    /// Citation impact category.
    pub citation_impact: CitationImpact,

    /// Venue quality tier from the venue table.
    pub venue_tier: VenueTier,

    /// Knowledge-graph categories, primary first.
    #[serde(default)]
    pub categories: Vec<String>,

    /// Methodology tags.
    #[serde(default)]
    pub methodologies: Vec<String>,

    /// Application-domain tags.
    #[serde(default)]
    pub application_domains: Vec<String>,

    /// Fraction of core metadata present.
    pub completeness: f64,
}

/// A related-paper entry in a per-node neighbor list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedPaper {
    /// Canonical paper id of the neighbor.
    pub id: String,

    /// Similarity weight of the edge.
    pub weight: f64,
}

/// Full output of one batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineReport {
    /// Unique run id.
    pub run_id: String,

    /// Report generation timestamp.
    pub generated_at: DateTime<Utc>,

    /// The query this batch ran.
    pub query: String,

    /// Aggregation counters.
    pub stats: AggregationStats,

    /// Canonical papers after deduplication, before ranking.
    pub resolved: usize,

    /// Papers flagged ambiguous by identity resolution.
    pub ambiguous: usize,

    /// Ranked papers at or above the acceptance threshold, best first.
    pub papers: Vec<RankedPaper>,

    /// Retained similarity edges, each pair once.
    #[serde(default)]
    pub edges: Vec<SimilarityEdge>,

    /// Top-K neighbor list per paper id.
    #[serde(default)]
    pub related: BTreeMap<String, Vec<RelatedPaper>>,

    /// Category labels per paper id, primary first.
    #[serde(default)]
    pub categories: BTreeMap<String, Vec<String>>,
}

impl PipelineReport {
    /// True when nothing survived ranking.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_stats_created_on_first_touch() {
        let mut stats = AggregationStats::default();
        stats.source_mut("openalex").requests += 1;
        stats.source_mut("openalex").successes += 1;
        assert_eq!(stats.sources["openalex"].requests, 1);
        assert!(!stats.all_failed());
    }

    #[test]
    fn test_all_failed() {
        let mut stats = AggregationStats::default();
        assert!(!stats.all_failed()); // nothing queried yet

        stats.source_mut("openalex").failures = 2;
        stats.source_mut("crossref").failures = 1;
        assert!(stats.all_failed());

        stats.source_mut("crossref").successes = 1;
        assert!(!stats.all_failed());
    }
}
