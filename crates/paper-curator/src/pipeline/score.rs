//! Relevance and quality scoring.
//!
//! Each resolved paper gets a composite score built from four terms:
//! concept relevance, citation impact, recency, and venue quality. Missing
//! metadata zeroes the affected term; scoring never fails.

use chrono::Datelike;

use crate::config::{CompositeWeights, Config, FieldMix, engine};
use crate::models::{CanonicalPaper, CompositeScore, ConceptContribution, RelevanceBreakdown};
use crate::tables::{Concept, VenueEntry, VenueTable, VenueTier};

/// Title keyword density is scaled by this factor before capping.
const TITLE_DENSITY_FACTOR: f64 = 10.0;

/// Abstract keyword density is scaled by this factor before capping.
const ABSTRACT_DENSITY_FACTOR: f64 = 100.0;

/// Flat-pool title density factor for the per-field breakdown.
const FIELD_TITLE_FACTOR: f64 = 5.0;

/// Flat-pool abstract density factor for the per-field breakdown.
const FIELD_ABSTRACT_FACTOR: f64 = 20.0;

/// A resolved paper together with its composite score.
#[derive(Debug, Clone)]
pub struct ScoredPaper {
    /// The resolved paper.
    pub paper: CanonicalPaper,
    /// Its composite score.
    pub score: CompositeScore,
}

/// Scores resolved papers against the configured concept and venue tables.
///
/// The current year is injected so citation and recency terms are
/// reproducible under test.
#[derive(Debug, Clone)]
pub struct Scorer {
    concepts: Vec<Concept>,
    venues: VenueTable,
    weights: CompositeWeights,
    field_mix: FieldMix,
    unknown_venue_score: f64,
    current_year: i32,
}

impl Scorer {
    /// Create a scorer using the wall-clock year.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            concepts: config.concepts.clone(),
            venues: config.venues.clone(),
            weights: config.composite_weights,
            field_mix: config.field_mix,
            unknown_venue_score: config.unknown_venue_score,
            current_year: chrono::Utc::now().year(),
        }
    }

    /// Create a scorer with a fixed current year.
    #[must_use]
    pub fn with_current_year(config: &Config, current_year: i32) -> Self {
        Self { current_year, ..Self::new(config) }
    }

    /// Score one paper.
    #[must_use]
    pub fn score(&self, paper: &CanonicalPaper) -> CompositeScore {
        let breakdown = self.relevance(paper);
        let citation_impact = self.citation_impact(paper);
        let recency = self.recency(paper);
        let venue_quality = breakdown.venue_score;

        let value = self.weights.relevance * breakdown.relevance
            + self.weights.citation * citation_impact
            + self.weights.recency * recency
            + self.weights.venue * venue_quality;

        CompositeScore {
            value,
            relevance: breakdown.relevance,
            citation_impact,
            recency,
            venue_quality,
            breakdown,
        }
    }

    /// Score every paper, consuming the resolved list.
    #[must_use]
    pub fn score_all(&self, papers: Vec<CanonicalPaper>) -> Vec<ScoredPaper> {
        papers
            .into_iter()
            .map(|paper| {
                let score = self.score(&paper);
                ScoredPaper { paper, score }
            })
            .collect()
    }

    /// Concept relevance with its per-concept and per-field breakdown.
    fn relevance(&self, paper: &CanonicalPaper) -> RelevanceBreakdown {
        let title = paper.title.to_lowercase();
        let abstract_text = paper.r#abstract.as_deref().unwrap_or("").to_lowercase();
        let keywords: Vec<String> = paper.keywords.iter().map(|k| k.to_lowercase()).collect();
        let joined_keywords = keywords.join(" ");

        let title_words = title.split_whitespace().count();
        let abstract_words = abstract_text.split_whitespace().count();
        let joined_keyword_words = joined_keywords.split_whitespace().count();

        let mut concepts = Vec::with_capacity(self.concepts.len());
        let mut relevance = 0.0;

        for concept in &self.concepts {
            let title_hits = count_hits(&concept.keywords, &title);
            let abstract_hits = count_hits(&concept.keywords, &abstract_text);
            let keyword_hits = concept
                .keywords
                .iter()
                .filter(|kw| keywords.iter().any(|k| k.contains(kw.as_str())))
                .count();

            let title_norm = density(title_hits, title_words, TITLE_DENSITY_FACTOR);
            let abstract_norm = density(abstract_hits, abstract_words, ABSTRACT_DENSITY_FACTOR);
            let keyword_norm =
                ((keyword_hits as f64) / (keywords.len().max(1) as f64)).min(1.0);

            let contribution = (self.field_mix.title * title_norm
                + self.field_mix.r#abstract * abstract_norm
                + self.field_mix.keywords * keyword_norm)
                * concept.weight;

            relevance += contribution;
            concepts.push(ConceptContribution {
                concept: concept.name.clone(),
                title_hits,
                abstract_hits,
                keyword_hits,
                contribution,
            });
        }

        // Flat pool across all concepts for the informational field scores.
        let pool: Vec<&String> =
            self.concepts.iter().flat_map(|c| c.keywords.iter()).collect();
        let title_score =
            density(count_ref_hits(&pool, &title), title_words, FIELD_TITLE_FACTOR);
        let abstract_score =
            density(count_ref_hits(&pool, &abstract_text), abstract_words, FIELD_ABSTRACT_FACTOR);
        let keyword_score =
            density(count_ref_hits(&pool, &joined_keywords), joined_keyword_words, 1.0);

        RelevanceBreakdown {
            concepts,
            title_score,
            abstract_score,
            keyword_score,
            venue_score: self.venue_score(paper.venue.as_deref()),
            relevance: relevance.min(1.0),
        }
    }

    /// Venue quality in [0,1].
    ///
    /// Exact table entries win; otherwise partial keyword matches score 0.15
    /// each, capped at 0.6 and floored at the unknown-venue default. A venue
    /// the table knows nothing about gets the default; a missing venue gets 0.
    fn venue_score(&self, venue: Option<&str>) -> f64 {
        let Some(venue) = venue else { return 0.0 };
        let trimmed = venue.trim();
        if trimmed.is_empty() {
            return 0.0;
        }

        if let Some(entry) = self.venues.lookup(trimmed) {
            return entry.quality_score();
        }

        let hits = self.venues.partial_matches(trimmed);
        if hits > 0 {
            ((hits as f64) * engine::PARTIAL_VENUE_WEIGHT)
                .min(engine::PARTIAL_VENUE_CAP)
                .max(self.unknown_venue_score)
        } else {
            self.unknown_venue_score
        }
    }

    /// Venue quality tier, [`VenueTier::Unknown`] for venues the table does
    /// not list.
    #[must_use]
    pub fn venue_tier(&self, paper: &CanonicalPaper) -> VenueTier {
        paper
            .venue
            .as_deref()
            .and_then(|venue| self.venues.lookup(venue))
            .map_or(VenueTier::Unknown, VenueEntry::tier)
    }

    /// Citation impact as `min(1, log10(citations_per_year + 1))`.
    fn citation_impact(&self, paper: &CanonicalPaper) -> f64 {
        let Some(year) = paper.year else { return 0.0 };
        let age = (self.current_year - year).max(1);
        let per_year = f64::from(paper.citation_count) / f64::from(age);
        (per_year + 1.0).log10().min(1.0)
    }

    /// Linear recency ramp over the configured horizon.
    fn recency(&self, paper: &CanonicalPaper) -> f64 {
        let Some(year) = paper.year else { return 0.0 };
        let age = (self.current_year - year).max(0);
        (1.0 - f64::from(age) / engine::RECENCY_HORIZON_YEARS).max(0.0)
    }
}

fn count_hits(keywords: &[String], text: &str) -> usize {
    keywords.iter().filter(|kw| text.contains(kw.as_str())).count()
}

fn count_ref_hits(keywords: &[&String], text: &str) -> usize {
    keywords.iter().filter(|kw| text.contains(kw.as_str())).count()
}

fn density(hits: usize, words: usize, factor: f64) -> f64 {
    if words == 0 {
        return 0.0;
    }
    ((hits as f64) / (words as f64) * factor).min(1.0)
}
