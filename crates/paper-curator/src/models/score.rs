//! Score types produced by the relevance and quality scorer.

use serde::{Deserialize, Serialize};

/// Per-concept contribution to the relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptContribution {
    /// Concept name.
    pub concept: String,

    /// Keyword hits in the title.
    pub title_hits: usize,

    /// Keyword hits in the abstract.
    pub abstract_hits: usize,

    /// Keyword hits in the keyword list.
    pub keyword_hits: usize,

    /// Weighted contribution, in [0, concept weight].
    pub contribution: f64,
}

/// Relevance breakdown: per-concept contributions plus per-field scores.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelevanceBreakdown {
    /// One entry per configured concept.
    pub concepts: Vec<ConceptContribution>,

    /// Keyword density score over the title.
    pub title_score: f64,

    /// Keyword density score over the abstract.
    pub abstract_score: f64,

    /// Keyword match rate over the keyword list.
    pub keyword_score: f64,

    /// Venue quality score.
    pub venue_score: f64,

    /// Capped sum of concept contributions.
    pub relevance: f64,
}

/// Composite score with its term values and the stored breakdown.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeScore {
    /// Final weighted score in [0,1].
    pub value: f64,

    /// Concept relevance term.
    pub relevance: f64,

    /// Citation impact term.
    pub citation_impact: f64,

    /// Recency term.
    pub recency: f64,

    /// Venue quality term.
    pub venue_quality: f64,

    /// Detailed relevance breakdown.
    pub breakdown: RelevanceBreakdown,
}

/// Citation impact category from the absolute citation count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CitationImpact {
    HighImpact,
    MediumImpact,
    Emerging,
    New,
}

impl CitationImpact {
    /// Categorize an absolute citation count.
    #[must_use]
    pub const fn from_count(count: u32) -> Self {
        match count {
            50.. => Self::HighImpact,
            20..=49 => Self::MediumImpact,
            5..=19 => Self::Emerging,
            _ => Self::New,
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::HighImpact => "high impact",
            Self::MediumImpact => "medium impact",
            Self::Emerging => "emerging",
            Self::New => "new",
        }
    }
}

/// Relevance tier for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelevanceTier {
    High,
    Medium,
    Low,
    Minimal,
}

impl RelevanceTier {
    /// Tier for a composite score.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 0.7 {
            Self::High
        } else if score >= 0.5 {
            Self::Medium
        } else if score >= 0.3 {
            Self::Low
        } else {
            Self::Minimal
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Minimal => "minimal",
        }
    }
}
