//! Category assignment and similarity link-graph assembly.
//!
//! Runs after ranking. Every ranked paper is first assigned knowledge-graph
//! categories from the category keyword table; category overlap then feeds
//! the pairwise similarity weight together with author, keyword, and
//! title-token overlap. Edges above the threshold are pruned to the top-K
//! strongest neighbors per paper.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use regex::Regex;

use crate::config::{Config, SimilarityWeights};
use crate::models::{CanonicalPaper, RelatedPaper, SimilarityEdge, SimilarityFactors};
use crate::pipeline::score::ScoredPaper;
use crate::tables::{Category, DEFAULT_CATEGORY};

/// The assembled link graph.
#[derive(Debug, Clone, Default)]
pub struct LinkGraph {
    /// Paper id to assigned category slugs, strongest match first.
    pub categories: BTreeMap<String, Vec<String>>,

    /// Retained edges, strongest first.
    pub edges: Vec<SimilarityEdge>,

    /// Paper id to its top-K neighbors, strongest first.
    pub related: BTreeMap<String, Vec<RelatedPaper>>,
}

/// Builds the category assignment and similarity graph for a ranked batch.
#[derive(Debug, Clone)]
pub struct LinkGraphBuilder {
    categories: Vec<Category>,
    weights: SimilarityWeights,
    edge_threshold: f64,
    top_k: usize,
}

impl LinkGraphBuilder {
    /// Create a builder from the pipeline configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            categories: config.categories.clone(),
            weights: config.similarity_weights,
            edge_threshold: config.edge_threshold,
            top_k: config.top_k_edges,
        }
    }

    /// Assemble the graph over the ranked papers.
    #[must_use]
    pub fn build(&self, scored: &[ScoredPaper]) -> LinkGraph {
        // Matches words with letters, numbers, and hyphens, so technical
        // terms like "CNN-LSTM" or "GPT-4" survive as single tokens.
        let word_pattern = Regex::new(r"\b[a-zA-Z][a-zA-Z0-9-]*[a-zA-Z0-9]\b|\b[a-zA-Z]{2,}\b")
            .expect("valid word regex pattern");

        let mut graph = LinkGraph::default();
        let mut category_sets: Vec<HashSet<String>> = Vec::with_capacity(scored.len());
        let mut title_tokens: Vec<HashSet<String>> = Vec::with_capacity(scored.len());
        let mut author_sets: Vec<HashSet<String>> = Vec::with_capacity(scored.len());
        let mut keyword_sets: Vec<HashSet<String>> = Vec::with_capacity(scored.len());

        for entry in scored {
            let paper = &entry.paper;
            let assigned = self.assign_categories(paper);
            category_sets.push(assigned.iter().cloned().collect());
            graph.categories.insert(paper.id.clone(), assigned);
            graph.related.insert(paper.id.clone(), Vec::new());

            title_tokens.push(tokenize(&word_pattern, &paper.title));
            author_sets.push(normalized_set(&paper.authors));
            keyword_sets.push(normalized_set(&paper.keywords));
        }

        // Pairwise pass over unordered pairs.
        let mut candidates: Vec<SimilarityEdge> = Vec::new();
        for i in 0..scored.len() {
            for j in (i + 1)..scored.len() {
                let factors = SimilarityFactors {
                    authors: jaccard(&author_sets[i], &author_sets[j]),
                    keywords: jaccard(&keyword_sets[i], &keyword_sets[j]),
                    categories: jaccard(&category_sets[i], &category_sets[j]),
                    title: jaccard(&title_tokens[i], &title_tokens[j]),
                    venue_bonus: if venues_match(&scored[i].paper, &scored[j].paper) {
                        self.weights.venue_bonus
                    } else {
                        0.0
                    },
                };

                let weight = self.weights.authors * factors.authors
                    + self.weights.keywords * factors.keywords
                    + self.weights.categories * factors.categories
                    + self.weights.title * factors.title
                    + factors.venue_bonus;

                if weight > self.edge_threshold {
                    candidates.push(SimilarityEdge::new(
                        &scored[i].paper.id,
                        &scored[j].paper.id,
                        weight,
                        factors,
                    ));
                }
            }
        }

        // Keep each paper's top-K neighbors; the edge set is the union of
        // the per-paper retained lists.
        let mut per_node: BTreeMap<&str, Vec<&SimilarityEdge>> = BTreeMap::new();
        for edge in &candidates {
            per_node.entry(&edge.a).or_default().push(edge);
            per_node.entry(&edge.b).or_default().push(edge);
        }

        let mut retained: BTreeSet<(&str, &str)> = BTreeSet::new();
        for (node, edges) in &mut per_node {
            edges.sort_by(|x, y| {
                y.weight.total_cmp(&x.weight).then_with(|| x.other(node).cmp(&y.other(node)))
            });
            edges.truncate(self.top_k);

            let neighbors = graph.related.entry((*node).to_string()).or_default();
            for edge in edges.iter() {
                retained.insert((edge.a.as_str(), edge.b.as_str()));
                if let Some(other) = edge.other(node) {
                    neighbors.push(RelatedPaper { id: other.to_string(), weight: edge.weight });
                }
            }
        }

        graph.edges = candidates
            .iter()
            .filter(|e| retained.contains(&(e.a.as_str(), e.b.as_str())))
            .cloned()
            .collect();
        graph.edges.sort_by(|x, y| {
            x.weight
                .total_cmp(&y.weight)
                .reverse()
                .then_with(|| x.a.cmp(&y.a))
                .then_with(|| x.b.cmp(&y.b))
        });

        graph
    }

    /// Categories for one paper, strongest match first.
    ///
    /// A category applies with at least one keyword match; ties fall back to
    /// table order. With no match at all the paper lands in the default
    /// category.
    fn assign_categories(&self, paper: &CanonicalPaper) -> Vec<String> {
        let text = paper.searchable_text();

        let mut matched: Vec<(usize, usize)> = self
            .categories
            .iter()
            .enumerate()
            .filter_map(|(index, category)| {
                let matches =
                    category.keywords.iter().filter(|kw| text.contains(kw.as_str())).count();
                (matches > 0).then_some((matches, index))
            })
            .collect();

        if matched.is_empty() {
            return vec![DEFAULT_CATEGORY.to_string()];
        }

        matched.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        matched.into_iter().map(|(_, index)| self.categories[index].slug.clone()).collect()
    }
}

fn tokenize(pattern: &Regex, title: &str) -> HashSet<String> {
    pattern.find_iter(&title.to_lowercase()).map(|m| m.as_str().to_string()).collect()
}

fn normalized_set(values: &[String]) -> HashSet<String> {
    values
        .iter()
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
        .collect()
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    (intersection as f64) / (union as f64)
}

fn venues_match(a: &CanonicalPaper, b: &CanonicalPaper) -> bool {
    match (&a.venue, &b.venue) {
        (Some(va), Some(vb)) => {
            let va = va.trim();
            !va.is_empty() && va.eq_ignore_ascii_case(vb.trim())
        }
        _ => false,
    }
}
