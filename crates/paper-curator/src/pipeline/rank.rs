//! Deterministic ranking of scored papers.

use crate::config::Config;
use crate::pipeline::score::ScoredPaper;

/// Filters, orders, and truncates scored papers.
///
/// Ordering is total: composite score descending, then highest contributor
/// source priority descending, then title ascending. Two runs over the same
/// input produce the same order.
#[derive(Debug, Clone, Copy)]
pub struct Ranker {
    min_composite_score: f64,
}

impl Ranker {
    /// Create a ranker from the pipeline configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self { min_composite_score: config.min_composite_score }
    }

    /// Rank the scored papers, keeping at most `max_results`.
    ///
    /// Papers scoring below the minimum (exclusive) are dropped; the minimum
    /// itself survives.
    #[must_use]
    pub fn rank(&self, mut scored: Vec<ScoredPaper>, max_results: usize) -> Vec<ScoredPaper> {
        scored.retain(|entry| entry.score.value >= self.min_composite_score);
        scored.sort_by(|a, b| {
            b.score
                .value
                .total_cmp(&a.score.value)
                .then_with(|| b.paper.source_priority().cmp(&a.paper.source_priority()))
                .then_with(|| a.paper.title.cmp(&b.paper.title))
        });
        scored.truncate(max_results);
        scored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CandidateRecord, CanonicalPaper, CompositeScore, RelevanceBreakdown};

    fn entry(id: &str, title: &str, priority: u8, value: f64) -> ScoredPaper {
        let record = CandidateRecord {
            title: title.to_string(),
            source: "openalex".to_string(),
            source_priority: priority,
            ..CandidateRecord::default()
        };
        let paper = CanonicalPaper::from_candidate(id.to_string(), record);
        let score = CompositeScore {
            value,
            relevance: 0.0,
            citation_impact: 0.0,
            recency: 0.0,
            venue_quality: 0.0,
            breakdown: RelevanceBreakdown::default(),
        };
        ScoredPaper { paper, score }
    }

    fn ranker() -> Ranker {
        Ranker::new(&Config::default())
    }

    #[test]
    fn test_orders_by_score_descending() {
        let ranked = ranker().rank(
            vec![
                entry("a", "The weakest result", 5, 0.4),
                entry("b", "The strongest result", 5, 0.9),
                entry("c", "The middle result", 5, 0.6),
            ],
            50,
        );

        let ids: Vec<&str> = ranked.iter().map(|e| e.paper.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_minimum_score_is_inclusive() {
        let ranked = ranker().rank(
            vec![
                entry("keep", "Exactly at the floor", 5, 0.2),
                entry("drop", "Just below the floor", 5, 0.199_999),
            ],
            50,
        );

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].paper.id, "keep");
    }

    #[test]
    fn test_score_tie_breaks_on_priority_then_title() {
        let ranked = ranker().rank(
            vec![
                entry("c", "Zeta analysis of gears", 3, 0.5),
                entry("a", "Alpha analysis of gears", 3, 0.5),
                entry("b", "Beta analysis of gears", 5, 0.5),
            ],
            50,
        );

        let ids: Vec<&str> = ranked.iter().map(|e| e.paper.id.as_str()).collect();
        // Priority first, then title.
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_truncates_to_max_results() {
        let ranked = ranker().rank(
            vec![
                entry("a", "First ranked paper", 5, 0.9),
                entry("b", "Second ranked paper", 5, 0.8),
                entry("c", "Third ranked paper", 5, 0.7),
            ],
            2,
        );

        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn test_ranking_is_reproducible() {
        let build = || {
            vec![
                entry("a", "Bearing diagnosis study", 3, 0.5),
                entry("b", "Gearbox prognosis study", 5, 0.5),
                entry("c", "Battery lifetime study", 4, 0.7),
            ]
        };

        let first = ranker().rank(build(), 50);
        let second = ranker().rank(build(), 50);

        let order = |r: &[ScoredPaper]| {
            r.iter().map(|e| e.paper.id.clone()).collect::<Vec<_>>()
        };
        assert_eq!(order(&first), order(&second));
    }
}
