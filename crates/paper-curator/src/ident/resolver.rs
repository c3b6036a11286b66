//! Duplicate resolution across sources.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::models::{CandidateRecord, CanonicalPaper};

use super::fingerprint::{Fingerprint, is_well_formed_doi, normalize_arxiv_id, normalize_doi};

/// Titles shorter than this never fuzzy-match.
const MIN_FUZZY_TITLE_CHARS: usize = 10;

/// Outcome of one resolution pass.
#[derive(Debug, Default)]
pub struct Resolution {
    /// Canonical papers, in first-seen order.
    pub papers: Vec<CanonicalPaper>,
    /// Candidates folded into an existing paper.
    pub merged: usize,
    /// Papers flagged ambiguous by identifier conflicts.
    pub ambiguous: usize,
}

/// Resolves candidate records into canonical papers.
///
/// Match precedence per candidate: exact DOI or arXiv id equality always
/// merges; fingerprint equality merges unless both sides carry well-formed
/// strong identifiers that disagree; a fuzzy title match above the threshold
/// merges when years are equal or unknown. Identifier conflicts keep both
/// records and flag them ambiguous instead of guessing.
///
/// The resolver owns its indexes and is consumed by [`resolve`], so state
/// never leaks across batches.
///
/// [`resolve`]: IdentityResolver::resolve
pub struct IdentityResolver {
    fuzzy_threshold: f64,
    papers: Vec<CanonicalPaper>,
    doi_index: HashMap<String, usize>,
    arxiv_index: HashMap<String, usize>,
    fingerprint_index: HashMap<Fingerprint, usize>,
    merged: usize,
}

impl IdentityResolver {
    /// Create a resolver with the given fuzzy title similarity threshold.
    #[must_use]
    pub fn new(fuzzy_threshold: f64) -> Self {
        Self {
            fuzzy_threshold,
            papers: Vec::new(),
            doi_index: HashMap::new(),
            arxiv_index: HashMap::new(),
            fingerprint_index: HashMap::new(),
            merged: 0,
        }
    }

    /// Resolve a batch of candidates, in order.
    ///
    /// Deterministic for a fixed input order: earlier candidates establish
    /// canonical identities that later duplicates fold into.
    #[must_use]
    pub fn resolve(mut self, candidates: Vec<CandidateRecord>) -> Resolution {
        for mut record in candidates {
            record.doi = record
                .doi
                .as_deref()
                .map(normalize_doi)
                .filter(|d| !d.is_empty());
            record.arxiv_id = record
                .arxiv_id
                .as_deref()
                .map(normalize_arxiv_id)
                .filter(|a| !a.is_empty());
            self.ingest(record);
        }
        let ambiguous = self.papers.iter().filter(|p| p.ambiguous).count();
        Resolution { papers: self.papers, merged: self.merged, ambiguous }
    }

    fn ingest(&mut self, record: CandidateRecord) {
        // Strong identifier equality is authoritative.
        if let Some(doi) = record.doi.as_deref() {
            if let Some(&idx) = self.doi_index.get(doi) {
                self.merge_into(idx, record);
                return;
            }
        }
        if let Some(arxiv) = record.arxiv_id.as_deref() {
            if let Some(&idx) = self.arxiv_index.get(arxiv) {
                self.merge_into(idx, record);
                return;
            }
        }

        let fp = Fingerprint::of_record(&record);
        if let Some(&idx) = self.fingerprint_index.get(&fp) {
            if self.identifier_conflict(idx, &record) {
                warn!(
                    fingerprint = %fp,
                    title = %record.title,
                    "identifier conflict on matching fingerprint, keeping both"
                );
                self.insert_ambiguous(idx, &fp, record);
            } else {
                self.merge_into(idx, record);
            }
            return;
        }

        if let Some(idx) = self.fuzzy_match(&record) {
            if self.identifier_conflict(idx, &record) {
                warn!(
                    title = %record.title,
                    "identifier conflict on fuzzy title match, keeping both"
                );
                self.insert_ambiguous(idx, &fp, record);
            } else {
                self.merge_into(idx, record);
            }
            return;
        }

        self.insert(fp, record);
    }

    /// Earliest paper whose title is similar enough and whose year does not
    /// disagree.
    fn fuzzy_match(&self, record: &CandidateRecord) -> Option<usize> {
        let title = record.title.trim().to_lowercase();
        if title.chars().count() < MIN_FUZZY_TITLE_CHARS {
            return None;
        }
        self.papers.iter().position(|paper| {
            let existing = paper.title.trim().to_lowercase();
            existing.chars().count() >= MIN_FUZZY_TITLE_CHARS
                && years_compatible(paper.year, record.year)
                && strsim::normalized_levenshtein(&title, &existing) > self.fuzzy_threshold
        })
    }

    /// True when both sides carry strong identifiers that disagree.
    fn identifier_conflict(&self, idx: usize, record: &CandidateRecord) -> bool {
        let paper = &self.papers[idx];
        let doi_conflict = match (paper.doi.as_deref(), record.doi.as_deref()) {
            (Some(a), Some(b)) => a != b && is_well_formed_doi(a) && is_well_formed_doi(b),
            _ => false,
        };
        let arxiv_conflict = match (paper.arxiv_id.as_deref(), record.arxiv_id.as_deref()) {
            (Some(a), Some(b)) => a != b,
            _ => false,
        };
        doi_conflict || arxiv_conflict
    }

    fn merge_into(&mut self, idx: usize, record: CandidateRecord) {
        debug!(id = %self.papers[idx].id, source = %record.source, "merging duplicate candidate");
        self.papers[idx].absorb(record);
        self.merged += 1;
        self.reindex(idx);
    }

    fn insert(&mut self, fp: Fingerprint, record: CandidateRecord) {
        let idx = self.papers.len();
        let paper = CanonicalPaper::from_candidate(self.unique_id(&fp), record);
        self.index_identifiers(idx, &paper);
        self.fingerprint_index.entry(fp).or_insert(idx);
        self.papers.push(paper);
    }

    /// Keep both sides of an identifier conflict, flagged for manual review.
    /// The fingerprint index keeps pointing at the first owner.
    fn insert_ambiguous(&mut self, existing: usize, fp: &Fingerprint, record: CandidateRecord) {
        self.papers[existing].ambiguous = true;
        let idx = self.papers.len();
        let mut paper = CanonicalPaper::from_candidate(self.unique_id(fp), record);
        paper.ambiguous = true;
        self.index_identifiers(idx, &paper);
        self.papers.push(paper);
    }

    /// Register a paper's strong identifiers; the first owner stays
    /// authoritative.
    fn index_identifiers(&mut self, idx: usize, paper: &CanonicalPaper) {
        if let Some(doi) = paper.doi.clone() {
            self.doi_index.entry(doi).or_insert(idx);
        }
        if let Some(arxiv) = paper.arxiv_id.clone() {
            self.arxiv_index.entry(arxiv).or_insert(idx);
        }
    }

    /// Re-register identifiers and the current fingerprint after a merge
    /// filled or replaced fields.
    fn reindex(&mut self, idx: usize) {
        let (doi, arxiv, fp) = {
            let paper = &self.papers[idx];
            (paper.doi.clone(), paper.arxiv_id.clone(), Fingerprint::of_paper(paper))
        };
        if let Some(doi) = doi {
            self.doi_index.entry(doi).or_insert(idx);
        }
        if let Some(arxiv) = arxiv {
            self.arxiv_index.entry(arxiv).or_insert(idx);
        }
        self.fingerprint_index.entry(fp).or_insert(idx);
    }

    /// Canonical ids stay unique even when a fingerprint is shared by
    /// unmerged ambiguous papers.
    fn unique_id(&self, fp: &Fingerprint) -> String {
        let base = fp.as_str();
        if !self.papers.iter().any(|p| p.id == base) {
            return base.to_string();
        }
        let mut n = 2;
        loop {
            let id = format!("{base}-{n}");
            if !self.papers.iter().any(|p| p.id == id) {
                return id;
            }
            n += 1;
        }
    }
}

fn years_compatible(a: Option<i32>, b: Option<i32>) -> bool {
    match (a, b) {
        (Some(x), Some(y)) => x == y,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(title: &str, source: &str, priority: u8) -> CandidateRecord {
        CandidateRecord {
            title: title.to_string(),
            authors: vec!["Zhang, Wei".to_string()],
            year: Some(2022),
            source: source.to_string(),
            source_priority: priority,
            ..Default::default()
        }
    }

    fn resolve(candidates: Vec<CandidateRecord>) -> Resolution {
        IdentityResolver::new(0.9).resolve(candidates)
    }

    #[test]
    fn test_same_doi_always_merges() {
        let mut a = candidate("Bearing RUL prediction with transformers", "openalex", 5);
        a.doi = Some("https://doi.org/10.1016/j.ymssp.2022.109605".to_string());
        let mut b = candidate("Bearing remaining useful life prediction using transformers", "crossref", 4);
        b.doi = Some("10.1016/J.YMSSP.2022.109605".to_string());

        let resolution = resolve(vec![a, b]);
        assert_eq!(resolution.papers.len(), 1);
        assert_eq!(resolution.merged, 1);
        assert_eq!(resolution.papers[0].contributors.len(), 2);
        assert_eq!(resolution.papers[0].doi.as_deref(), Some("10.1016/j.ymssp.2022.109605"));
    }

    #[test]
    fn test_fingerprint_match_merges_without_identifiers() {
        let a = candidate("Deep learning for gearbox fault diagnosis", "openalex", 5);
        let b = candidate("Deep Learning for Gearbox Fault Diagnosis!", "semantic_scholar", 3);

        let resolution = resolve(vec![a, b]);
        assert_eq!(resolution.papers.len(), 1);
        assert_eq!(resolution.merged, 1);
    }

    #[test]
    fn test_conflicting_dois_keep_both_flagged() {
        let mut a = candidate("Deep learning for gearbox fault diagnosis", "openalex", 5);
        a.doi = Some("10.1016/j.ymssp.2022.100001".to_string());
        let mut b = candidate("Deep Learning for Gearbox Fault Diagnosis", "crossref", 4);
        b.doi = Some("10.1016/j.ymssp.2022.200002".to_string());

        let resolution = resolve(vec![a, b]);
        assert_eq!(resolution.papers.len(), 2);
        assert_eq!(resolution.ambiguous, 2);
        assert!(resolution.papers.iter().all(|p| p.ambiguous));
        // ids stay distinct even with identical fingerprints
        assert_ne!(resolution.papers[0].id, resolution.papers[1].id);
    }

    #[test]
    fn test_fuzzy_merge_of_punctuation_variant() {
        // different venues, so fingerprints differ; the fuzzy rule catches it
        let mut a = candidate("Deep learning for bearing fault diagnosis", "openalex", 5);
        a.venue = Some("IEEE Access".to_string());
        let mut b = candidate("Deep learning for bearing fault diagnosis.", "semantic_scholar", 3);
        b.venue = Some("ieee access journal".to_string());

        let resolution = resolve(vec![a, b]);
        assert_eq!(resolution.papers.len(), 1);
        assert_eq!(resolution.merged, 1);
    }

    #[test]
    fn test_fuzzy_requires_compatible_years() {
        let mut a = candidate("Deep learning for bearing fault diagnosis", "openalex", 5);
        a.venue = Some("IEEE Access".to_string());
        let mut b = candidate("Deep learning for bearing fault diagnosis.", "crossref", 4);
        b.venue = Some("Sensors".to_string());
        b.year = Some(2021);

        let resolution = resolve(vec![a, b]);
        assert_eq!(resolution.papers.len(), 2);
    }

    #[test]
    fn test_short_titles_never_fuzzy_match() {
        let mut a = candidate("Short", "openalex", 5);
        a.venue = Some("IEEE Access".to_string());
        let mut b = candidate("Shorts", "crossref", 4);
        b.venue = Some("Sensors".to_string());

        let resolution = resolve(vec![a, b]);
        assert_eq!(resolution.papers.len(), 2);
    }

    #[test]
    fn test_distinct_papers_stay_separate() {
        let a = candidate("Transfer learning across bearing datasets", "openalex", 5);
        let b = candidate("Digital twins for wind turbine gearboxes", "openalex", 5);

        let resolution = resolve(vec![a, b]);
        assert_eq!(resolution.papers.len(), 2);
        assert_eq!(resolution.merged, 0);
        assert_eq!(resolution.ambiguous, 0);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let mut a = candidate("Bearing RUL prediction with transformers", "openalex", 5);
        a.doi = Some("10.1016/j.ymssp.2022.109605".to_string());
        let b = candidate("Bearing RUL prediction with transformers", "crossref", 4);
        let first = resolve(vec![a, b]);
        assert_eq!(first.papers.len(), 1);

        // feed the canonical output back through a fresh resolver
        let again: Vec<CandidateRecord> = first
            .papers
            .iter()
            .map(|p| CandidateRecord {
                title: p.title.clone(),
                authors: p.authors.clone(),
                year: p.year,
                venue: p.venue.clone(),
                doi: p.doi.clone(),
                arxiv_id: p.arxiv_id.clone(),
                r#abstract: p.r#abstract.clone(),
                keywords: p.keywords.clone(),
                citation_count: p.citation_count,
                source: "openalex".to_string(),
                source_priority: 5,
            })
            .collect();
        let second = resolve(again);
        assert_eq!(second.papers.len(), first.papers.len());
        assert_eq!(second.papers[0].title, first.papers[0].title);
    }
}
