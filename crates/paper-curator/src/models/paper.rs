//! Canonical papers produced by identity resolution.

use serde::{Deserialize, Serialize};

use super::record::CandidateRecord;

/// Provenance tag for one contributing source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceTag {
    /// Source name, e.g. `openalex`.
    pub name: String,

    /// Source priority at ingestion time.
    pub priority: u8,
}

/// A deduplicated paper owning the merged view of its contributing records.
///
/// Created from the first candidate that establishes a new identity; later
/// duplicates are folded in through [`CanonicalPaper::absorb`]. The merge
/// policy never overwrites a non-empty field with an empty one, and strong
/// identifiers (DOI, arXiv) are immutable once set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalPaper {
    /// Stable ID: the identity fingerprint at creation time.
    pub id: String,

    /// Paper title.
    pub title: String,

    /// Author display names.
    #[serde(default)]
    pub authors: Vec<String>,

    /// Publication year.
    #[serde(default)]
    pub year: Option<i32>,

    /// Publication venue.
    #[serde(default)]
    pub venue: Option<String>,

    /// Normalized Digital Object Identifier.
    #[serde(default)]
    pub doi: Option<String>,

    /// ArXiv preprint ID.
    #[serde(default)]
    pub arxiv_id: Option<String>,

    /// Paper abstract.
    #[serde(default)]
    pub r#abstract: Option<String>,

    /// Keywords or subject tags.
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Highest citation count reported by any contributor.
    #[serde(default)]
    pub citation_count: u32,

    /// Contributing sources, in merge order.
    #[serde(default)]
    pub contributors: Vec<SourceTag>,

    /// Set when an identifier conflict blocked a likely merge; the paper is
    /// kept unmerged for manual review.
    #[serde(default)]
    pub ambiguous: bool,

    // Priority of the contributor that supplied title and authors.
    #[serde(skip)]
    headline_priority: u8,
}

impl CanonicalPaper {
    /// Promote a candidate into a new canonical paper.
    #[must_use]
    pub fn from_candidate(id: String, record: CandidateRecord) -> Self {
        let CandidateRecord {
            title,
            authors,
            year,
            venue,
            doi,
            arxiv_id,
            r#abstract,
            keywords,
            citation_count,
            source,
            source_priority,
        } = record;
        Self {
            id,
            title,
            authors,
            year,
            venue: non_empty(venue),
            doi: non_empty(doi),
            arxiv_id: non_empty(arxiv_id),
            r#abstract: non_empty(r#abstract),
            keywords,
            citation_count,
            contributors: vec![SourceTag { name: source, priority: source_priority }],
            ambiguous: false,
            headline_priority: source_priority,
        }
    }

    /// Fold a duplicate candidate into this paper.
    ///
    /// Title and authors follow the highest-priority contributor (first seen
    /// wins ties); the citation count takes the maximum; empty optional
    /// fields are filled from the candidate; nothing non-empty is ever
    /// replaced by something empty.
    pub fn absorb(&mut self, record: CandidateRecord) {
        let CandidateRecord {
            title,
            authors,
            year,
            venue,
            doi,
            arxiv_id,
            r#abstract,
            keywords,
            citation_count,
            source,
            source_priority,
        } = record;

        let replace_headline = !title.trim().is_empty()
            && (self.title.trim().is_empty() || source_priority > self.headline_priority);
        if replace_headline {
            self.title = title;
            self.headline_priority = source_priority;
            if !authors.is_empty() {
                self.authors = authors;
            }
        } else if self.authors.is_empty() && !authors.is_empty() {
            self.authors = authors;
        }

        self.citation_count = self.citation_count.max(citation_count);
        if self.year.is_none() {
            self.year = year;
        }
        fill(&mut self.venue, venue);
        fill(&mut self.doi, doi);
        fill(&mut self.arxiv_id, arxiv_id);
        fill(&mut self.r#abstract, r#abstract);
        if self.keywords.is_empty() {
            self.keywords = keywords;
        }

        let tag = SourceTag { name: source, priority: source_priority };
        if !self.contributors.contains(&tag) {
            self.contributors.push(tag);
        }
    }

    /// Highest contributor priority; used for ranking tie-breaks.
    #[must_use]
    pub fn source_priority(&self) -> u8 {
        self.contributors.iter().map(|c| c.priority).max().unwrap_or(0)
    }

    /// First author's name, when present.
    #[must_use]
    pub fn first_author(&self) -> Option<&str> {
        self.authors.first().map(String::as_str)
    }

    /// Author names as a comma-separated string.
    #[must_use]
    pub fn author_names(&self) -> String {
        self.authors.join(", ")
    }

    /// True when the paper carries a non-empty DOI.
    #[must_use]
    pub fn has_doi(&self) -> bool {
        self.doi.as_deref().is_some_and(|d| !d.is_empty())
    }

    /// Fraction of core metadata present, over
    /// {title, authors, abstract, doi, venue, year}.
    #[must_use]
    pub fn completeness(&self) -> f64 {
        let present = [
            !self.title.trim().is_empty(),
            !self.authors.is_empty(),
            self.r#abstract.as_deref().is_some_and(|a| !a.is_empty()),
            self.doi.as_deref().is_some_and(|d| !d.is_empty()),
            self.venue.as_deref().is_some_and(|v| !v.is_empty()),
            self.year.is_some(),
        ];
        present.iter().filter(|p| **p).count() as f64 / present.len() as f64
    }

    /// Lowercased title, abstract, and keywords joined for keyword scanning.
    #[must_use]
    pub fn searchable_text(&self) -> String {
        let mut text = self.title.to_lowercase();
        if let Some(abstract_text) = &self.r#abstract {
            text.push(' ');
            text.push_str(&abstract_text.to_lowercase());
        }
        for keyword in &self.keywords {
            text.push(' ');
            text.push_str(&keyword.to_lowercase());
        }
        text
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn fill(slot: &mut Option<String>, value: Option<String>) {
    if slot.as_deref().is_none_or(|s| s.trim().is_empty()) {
        if let Some(v) = non_empty(value) {
            *slot = Some(v);
        }
    }
}
