//! Multi-source candidate aggregation.
//!
//! Queries every active source adapter in descending priority order, applies
//! the bounded retry policy to transient failures, validates the returned
//! records, and stops early once enough candidates have been collected. A
//! failing source is skipped; aggregation itself never fails.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::{Config, RetryPolicy, engine};
use crate::error::SourceError;
use crate::models::{AggregationStats, CandidateRecord};
use crate::sources::{SourceAdapter, YearRange};
use crate::tables::SourcePriorities;

/// Aggregates candidate records from all configured sources.
pub struct Aggregator {
    adapters: Vec<Arc<dyn SourceAdapter>>,
    priorities: SourcePriorities,
    retry: RetryPolicy,
    source_timeout: Duration,
    min_title_len: usize,
    oversample_factor: usize,
}

impl Aggregator {
    /// Create an aggregator over the given adapters.
    #[must_use]
    pub fn new(adapters: Vec<Arc<dyn SourceAdapter>>, config: &Config) -> Self {
        Self {
            adapters,
            priorities: config.priorities.clone(),
            retry: config.retry,
            source_timeout: config.source_timeout,
            min_title_len: config.min_title_len,
            oversample_factor: config.oversample_factor,
        }
    }

    /// Collect candidate records for `query` from every active source.
    ///
    /// When `source_override` is set, only the named sources are queried, in
    /// the override order. Otherwise all adapters run in descending priority
    /// order. Sources that fail after retries are skipped; if every source
    /// fails the candidate list is empty and the statistics say why.
    pub async fn search(
        &self,
        query: &str,
        max_results: usize,
        year_range: Option<YearRange>,
        source_override: Option<&[String]>,
    ) -> (Vec<CandidateRecord>, AggregationStats) {
        let mut stats = AggregationStats::default();
        let active = self.active_adapters(source_override);

        if active.is_empty() {
            warn!("no active sources, skipping aggregation");
            return (Vec::new(), stats);
        }

        let per_source_limit = (max_results / active.len()).max(engine::MIN_PER_SOURCE_LIMIT);
        let cutoff = max_results.saturating_mul(self.oversample_factor);

        let mut candidates: Vec<CandidateRecord> = Vec::new();

        for adapter in &active {
            if candidates.len() >= cutoff {
                debug!(candidates = candidates.len(), "enough candidates, skipping remaining sources");
                stats.terminated_early = true;
                break;
            }

            let name = adapter.name();
            let priority = self.priorities.priority_for(name);

            match self.search_one(adapter.as_ref(), query, per_source_limit, year_range, &mut stats).await {
                Ok(records) => {
                    stats.source_mut(name).successes += 1;

                    let mut kept = 0u32;
                    for mut record in records {
                        record.source_priority = priority;
                        match record.validate(self.min_title_len) {
                            Ok(()) => {
                                kept += 1;
                                candidates.push(record);
                            }
                            Err(err) => {
                                debug!(source = name, error = %err, "dropping invalid record");
                                stats.dropped_invalid += 1;
                            }
                        }
                    }
                    stats.source_mut(name).records_found += kept;
                    debug!(source = name, records = kept, "source returned records");
                }
                Err(err) => {
                    stats.source_mut(name).failures += 1;
                    warn!(source = name, error = %err, "source failed, skipping");
                }
            }
        }

        stats.candidates = candidates.len();
        (candidates, stats)
    }

    /// Query one adapter with a whole-call timeout and bounded retries.
    async fn search_one(
        &self,
        adapter: &dyn SourceAdapter,
        query: &str,
        limit: usize,
        year_range: Option<YearRange>,
        stats: &mut AggregationStats,
    ) -> Result<Vec<CandidateRecord>, SourceError> {
        let name = adapter.name();
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            stats.source_mut(name).requests += 1;

            let result = match tokio::time::timeout(
                self.source_timeout,
                adapter.search(query, limit, year_range),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => Err(SourceError::Timeout(self.source_timeout)),
            };

            match result {
                Ok(records) => return Ok(records),
                Err(err) if err.is_retryable() && attempt < self.retry.max_attempts => {
                    let delay = self.retry.delay_for(attempt);
                    warn!(source = name, attempt, delay_ms = delay.as_millis() as u64, error = %err, "retrying source");
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Resolve the adapter order for this run.
    ///
    /// Override names are matched case-insensitively; unknown names are
    /// ignored. Without an override, adapters run in descending priority
    /// order with configuration order breaking ties.
    fn active_adapters(&self, source_override: Option<&[String]>) -> Vec<Arc<dyn SourceAdapter>> {
        match source_override {
            Some(names) => names
                .iter()
                .filter_map(|name| {
                    self.adapters
                        .iter()
                        .find(|adapter| adapter.name().eq_ignore_ascii_case(name))
                        .cloned()
                })
                .collect(),
            None => {
                let mut active = self.adapters.clone();
                active.sort_by(|a, b| {
                    let pa = self.priorities.priority_for(a.name());
                    let pb = self.priorities.priority_for(b.name());
                    pb.cmp(&pa)
                });
                active
            }
        }
    }
}
