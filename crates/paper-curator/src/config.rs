//! Configuration for the paper curation pipeline.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};
use crate::tables::{
    self, Category, Concept, KeywordGroup, SourcePriorities, VenueTable,
};

/// API configuration constants.
pub mod api {
    use std::time::Duration;

    /// Base URL for the OpenAlex API.
    pub const OPENALEX_URL: &str = "https://api.openalex.org";

    /// Base URL for the Crossref API.
    pub const CROSSREF_URL: &str = "https://api.crossref.org";

    /// Base URL for the Semantic Scholar API.
    pub const SEMANTIC_SCHOLAR_URL: &str = "https://api.semanticscholar.org";

    /// Request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Rate limit delay between requests (200ms = 5 req/s).
    pub const RATE_LIMIT_DELAY: Duration = Duration::from_millis(200);

    /// Whole-call timeout per source, covering transport retries.
    pub const SOURCE_TIMEOUT: Duration = Duration::from_secs(90);

    /// Cache TTL (5 minutes).
    pub const CACHE_TTL: Duration = Duration::from_secs(300);

    /// Maximum cache size.
    pub const CACHE_MAX_SIZE: u64 = 1000;

    /// Maximum keepalive connections.
    pub const MAX_KEEPALIVE: usize = 10;

    /// Keepalive expiry.
    pub const KEEPALIVE_EXPIRY: Duration = Duration::from_secs(30);
}

/// Engine tuning constants.
pub mod engine {
    use std::time::Duration;

    /// Default maximum results per batch.
    pub const MAX_RESULTS: usize = 50;

    /// Floor for the per-source fetch limit.
    pub const MIN_PER_SOURCE_LIMIT: usize = 10;

    /// Aggregation stops early once candidates reach this multiple of the
    /// requested maximum.
    pub const OVERSAMPLE_FACTOR: usize = 2;

    /// Minimum composite score for a paper to survive ranking (inclusive).
    pub const MIN_COMPOSITE_SCORE: f64 = 0.2;

    /// Minimum title length for a candidate to pass ingestion validation.
    pub const MIN_TITLE_LEN: usize = 10;

    /// Fuzzy title similarity threshold for duplicate detection.
    pub const FUZZY_TITLE_THRESHOLD: f64 = 0.9;

    /// Similarity threshold for link-graph edges (exclusive).
    pub const EDGE_THRESHOLD: f64 = 0.3;

    /// Neighbors kept per paper in the link graph.
    pub const TOP_K_EDGES: usize = 5;

    /// Venue score for unknown venues.
    pub const UNKNOWN_VENUE_SCORE: f64 = 0.3;

    /// Per-keyword weight for partial venue matching.
    pub const PARTIAL_VENUE_WEIGHT: f64 = 0.15;

    /// Cap on the partial venue score.
    pub const PARTIAL_VENUE_CAP: f64 = 0.6;

    /// Recency ramp length in years.
    pub const RECENCY_HORIZON_YEARS: f64 = 10.0;

    /// Retry attempts per adapter call.
    pub const RETRY_MAX_ATTEMPTS: u32 = 3;

    /// Delay before the first adapter retry.
    pub const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

    /// Backoff multiplier between adapter retries.
    pub const RETRY_MULTIPLIER: f64 = 2.0;
}

/// Weights for the composite score terms.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CompositeWeights {
    /// Concept relevance weight
    pub relevance: f64,
    /// Citation impact weight
    pub citation: f64,
    /// Recency weight
    pub recency: f64,
    /// Venue quality weight
    pub venue: f64,
}

impl CompositeWeights {
    /// Sum of all term weights.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.relevance + self.citation + self.recency + self.venue
    }
}

impl Default for CompositeWeights {
    fn default() -> Self {
        Self { relevance: 0.4, citation: 0.3, recency: 0.2, venue: 0.1 }
    }
}

/// Per-field mix within concept relevance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FieldMix {
    /// Title hit weight
    pub title: f64,
    /// Abstract hit weight
    pub r#abstract: f64,
    /// Keyword list hit weight
    pub keywords: f64,
}

impl FieldMix {
    /// Sum of all field weights.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.title + self.r#abstract + self.keywords
    }
}

impl Default for FieldMix {
    fn default() -> Self {
        Self { title: 0.4, r#abstract: 0.4, keywords: 0.2 }
    }
}

/// Weights for the pairwise similarity factors.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SimilarityWeights {
    /// Author overlap weight
    pub authors: f64,
    /// Keyword overlap weight
    pub keywords: f64,
    /// Category overlap weight
    pub categories: f64,
    /// Title token overlap weight
    pub title: f64,
    /// Flat bonus for an exact non-default venue match
    pub venue_bonus: f64,
}

impl SimilarityWeights {
    /// Sum of the Jaccard factor weights, excluding the venue bonus.
    #[must_use]
    pub fn jaccard_sum(&self) -> f64 {
        self.authors + self.keywords + self.categories + self.title
    }
}

impl Default for SimilarityWeights {
    fn default() -> Self {
        Self { authors: 0.3, keywords: 0.25, categories: 0.2, title: 0.15, venue_bonus: 0.1 }
    }
}

/// Bounded retry policy applied by the aggregator around each adapter call.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts including the first call
    pub max_attempts: u32,
    /// Delay before the first retry
    pub base_delay: Duration,
    /// Multiplier applied to the delay after each retry
    pub multiplier: f64,
}

impl RetryPolicy {
    /// Delay before the given retry (1-based).
    #[must_use]
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = self.multiplier.powi(retry.saturating_sub(1) as i32);
        self.base_delay.mul_f64(factor)
    }

    /// Policy that never retries, for tests.
    #[must_use]
    pub const fn none() -> Self {
        Self { max_attempts: 1, base_delay: Duration::ZERO, multiplier: 1.0 }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: engine::RETRY_MAX_ATTEMPTS,
            base_delay: engine::RETRY_BASE_DELAY,
            multiplier: engine::RETRY_MULTIPLIER,
        }
    }
}

/// Pipeline configuration.
///
/// Holds every externally tunable table and threshold; validated once at
/// startup, then treated as read-only by the pipeline.
#[derive(Debug, Clone)]
pub struct Config {
    /// Semantic Scholar API key (optional).
    pub semantic_scholar_api_key: Option<String>,

    /// Contact email for polite-pool access to OpenAlex and Crossref.
    pub mailto: Option<String>,

    /// Base URL for OpenAlex (overridable for mock servers).
    pub openalex_url: String,

    /// Base URL for Crossref (overridable for mock servers).
    pub crossref_url: String,

    /// Base URL for Semantic Scholar (overridable for mock servers).
    pub semantic_scholar_url: String,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Rate limit delay between requests.
    pub rate_limit_delay: Duration,

    /// Whole-call timeout per source.
    pub source_timeout: Duration,

    /// Cache TTL.
    pub cache_ttl: Duration,

    /// Maximum cache size.
    pub cache_max_size: u64,

    /// Retry policy around adapter calls.
    pub retry: RetryPolicy,

    /// Maximum ranked results per batch.
    pub max_results: usize,

    /// Aggregation stops early once candidates reach this multiple of the
    /// requested maximum.
    pub oversample_factor: usize,

    /// Minimum composite score (inclusive) to survive ranking.
    pub min_composite_score: f64,

    /// Minimum title length accepted at ingestion.
    pub min_title_len: usize,

    /// Fuzzy title similarity threshold for duplicate detection.
    pub fuzzy_title_threshold: f64,

    /// Similarity threshold (exclusive) for link-graph edges.
    pub edge_threshold: f64,

    /// Neighbors kept per paper in the link graph.
    pub top_k_edges: usize,

    /// Venue score for unknown venues.
    pub unknown_venue_score: f64,

    /// Composite score term weights.
    pub composite_weights: CompositeWeights,

    /// Per-field mix within concept relevance.
    pub field_mix: FieldMix,

    /// Pairwise similarity factor weights.
    pub similarity_weights: SimilarityWeights,

    /// Weighted concept table.
    pub concepts: Vec<Concept>,

    /// Venue quality table.
    pub venues: VenueTable,

    /// Knowledge-graph category table.
    pub categories: Vec<Category>,

    /// Methodology keyword groups.
    pub methodologies: Vec<KeywordGroup>,

    /// Application-domain keyword groups.
    pub domains: Vec<KeywordGroup>,

    /// Source priority table.
    pub priorities: SourcePriorities,
}

impl Config {
    /// Create a configuration with the default PHM tables.
    #[must_use]
    pub fn new(semantic_scholar_api_key: Option<String>, mailto: Option<String>) -> Self {
        Self {
            semantic_scholar_api_key,
            mailto,
            openalex_url: api::OPENALEX_URL.to_string(),
            crossref_url: api::CROSSREF_URL.to_string(),
            semantic_scholar_url: api::SEMANTIC_SCHOLAR_URL.to_string(),
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            rate_limit_delay: api::RATE_LIMIT_DELAY,
            source_timeout: api::SOURCE_TIMEOUT,
            cache_ttl: api::CACHE_TTL,
            cache_max_size: api::CACHE_MAX_SIZE,
            retry: RetryPolicy::default(),
            max_results: engine::MAX_RESULTS,
            oversample_factor: engine::OVERSAMPLE_FACTOR,
            min_composite_score: engine::MIN_COMPOSITE_SCORE,
            min_title_len: engine::MIN_TITLE_LEN,
            fuzzy_title_threshold: engine::FUZZY_TITLE_THRESHOLD,
            edge_threshold: engine::EDGE_THRESHOLD,
            top_k_edges: engine::TOP_K_EDGES,
            unknown_venue_score: engine::UNKNOWN_VENUE_SCORE,
            composite_weights: CompositeWeights::default(),
            field_mix: FieldMix::default(),
            similarity_weights: SimilarityWeights::default(),
            concepts: tables::default_concepts(),
            venues: tables::default_venues(),
            categories: tables::default_categories(),
            methodologies: tables::default_methodologies(),
            domains: tables::default_domains(),
            priorities: tables::default_source_priorities(),
        }
    }

    /// Create a test configuration pointing every source at a mock server.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            openalex_url: base_url.to_string(),
            crossref_url: base_url.to_string(),
            semantic_scholar_url: base_url.to_string(),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            rate_limit_delay: Duration::from_millis(0), // No delay in tests
            source_timeout: Duration::from_secs(5),
            cache_ttl: Duration::from_secs(0), // No caching in tests
            cache_max_size: 0,
            retry: RetryPolicy::none(),
            ..Self::new(None, None)
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when the assembled configuration fails validation.
    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = std::env::var("SEMANTIC_SCHOLAR_API_KEY").ok();
        let mailto = std::env::var("CURATOR_MAILTO").ok();
        let config = Self::new(api_key, mailto);
        config.validate()?;
        Ok(config)
    }

    /// Check if a Semantic Scholar API key is configured.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.semantic_scholar_api_key.is_some()
    }

    /// Validate weights, thresholds, and tables.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] on the first corrupt value.
    /// A failed validation must abort the run before any source is queried.
    pub fn validate(&self) -> PipelineResult<()> {
        check_unit_interval("min_composite_score", self.min_composite_score)?;
        check_unit_interval("fuzzy_title_threshold", self.fuzzy_title_threshold)?;
        check_unit_interval("edge_threshold", self.edge_threshold)?;
        check_unit_interval("unknown_venue_score", self.unknown_venue_score)?;

        check_weight("composite.relevance", self.composite_weights.relevance)?;
        check_weight("composite.citation", self.composite_weights.citation)?;
        check_weight("composite.recency", self.composite_weights.recency)?;
        check_weight("composite.venue", self.composite_weights.venue)?;
        if self.composite_weights.sum() <= 0.0 {
            return Err(PipelineError::invalid_config("composite weights sum to zero"));
        }

        check_weight("field_mix.title", self.field_mix.title)?;
        check_weight("field_mix.abstract", self.field_mix.r#abstract)?;
        check_weight("field_mix.keywords", self.field_mix.keywords)?;
        if self.field_mix.sum() <= 0.0 {
            return Err(PipelineError::invalid_config("field mix weights sum to zero"));
        }

        check_weight("similarity.authors", self.similarity_weights.authors)?;
        check_weight("similarity.keywords", self.similarity_weights.keywords)?;
        check_weight("similarity.categories", self.similarity_weights.categories)?;
        check_weight("similarity.title", self.similarity_weights.title)?;
        check_weight("similarity.venue_bonus", self.similarity_weights.venue_bonus)?;
        if self.similarity_weights.jaccard_sum() <= 0.0 {
            return Err(PipelineError::invalid_config("similarity weights sum to zero"));
        }

        if self.max_results == 0 {
            return Err(PipelineError::invalid_config("max_results must be at least 1"));
        }
        if self.oversample_factor == 0 {
            return Err(PipelineError::invalid_config("oversample_factor must be at least 1"));
        }
        if self.top_k_edges == 0 {
            return Err(PipelineError::invalid_config("top_k_edges must be at least 1"));
        }
        if self.retry.max_attempts == 0 {
            return Err(PipelineError::invalid_config("retry.max_attempts must be at least 1"));
        }

        if self.concepts.is_empty() {
            return Err(PipelineError::invalid_config("concept table is empty"));
        }
        for concept in &self.concepts {
            check_weight(&format!("concept '{}'", concept.name), concept.weight)?;
            if concept.keywords.is_empty() {
                return Err(PipelineError::invalid_config(format!(
                    "concept '{}' has no keywords",
                    concept.name
                )));
            }
        }
        if self.categories.is_empty() {
            return Err(PipelineError::invalid_config("category table is empty"));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(None, None)
    }
}

fn check_unit_interval(name: &str, value: f64) -> PipelineResult<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(PipelineError::invalid_config(format!("{name} must be in [0,1], got {value}")))
    }
}

fn check_weight(name: &str, value: f64) -> PipelineResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(PipelineError::invalid_config(format!(
            "{name} must be a finite non-negative weight, got {value}"
        )))
    }
}
