//! Link-graph edge types.

use serde::{Deserialize, Serialize};

/// Contributing factors for one similarity edge.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityFactors {
    /// Jaccard overlap of author sets.
    pub authors: f64,

    /// Jaccard overlap of keyword sets.
    pub keywords: f64,

    /// Jaccard overlap of assigned categories.
    pub categories: f64,

    /// Jaccard overlap of title tokens.
    pub title: f64,

    /// Flat bonus for an exact non-default venue match.
    pub venue_bonus: f64,
}

/// An undirected similarity edge between two canonical papers.
///
/// Endpoints are stored in lexicographic order so each pair appears exactly
/// once and weights are trivially symmetric.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityEdge {
    /// Smaller endpoint id.
    pub a: String,

    /// Larger endpoint id.
    pub b: String,

    /// Similarity weight in [0,1].
    pub weight: f64,

    /// Factor decomposition of the weight.
    pub factors: SimilarityFactors,
}

impl SimilarityEdge {
    /// Build an edge with endpoints in canonical order.
    #[must_use]
    pub fn new(a: &str, b: &str, weight: f64, factors: SimilarityFactors) -> Self {
        let (a, b) = if a <= b { (a, b) } else { (b, a) };
        Self { a: a.to_string(), b: b.to_string(), weight, factors }
    }

    /// True when `id` is one of the two endpoints.
    #[must_use]
    pub fn touches(&self, id: &str) -> bool {
        self.a == id || self.b == id
    }

    /// The opposite endpoint, when `id` is one of the two.
    #[must_use]
    pub fn other(&self, id: &str) -> Option<&str> {
        if self.a == id {
            Some(&self.b)
        } else if self.b == id {
            Some(&self.a)
        } else {
            None
        }
    }
}
