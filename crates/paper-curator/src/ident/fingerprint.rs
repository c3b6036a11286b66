//! Weak identity fingerprints and identifier normalization.

use std::fmt;

use regex::Regex;
use sha2::{Digest, Sha256};

use crate::models::{CandidateRecord, CanonicalPaper};

// Character budgets for the fingerprint key components.
const TITLE_CHARS: usize = 100;
const SURNAME_CHARS: usize = 20;
const VENUE_CHARS: usize = 30;

/// Weak identity key bucketing likely duplicates.
///
/// The first 16 hex characters of SHA-256 over
/// `title[:100]|surname[:20]|year|venue[:30]` with all parts normalized.
/// Equal fingerprints nominate records for merging; the merge policy still
/// decides.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Compute a fingerprint from raw identity fields.
    #[must_use]
    pub fn compute(
        title: &str,
        first_author: Option<&str>,
        year: Option<i32>,
        venue: Option<&str>,
    ) -> Self {
        let title = normalize_title(title);
        let surname = first_author.map(first_author_surname).unwrap_or_default();
        let venue = venue.map(normalize_title).unwrap_or_default();
        let key = format!(
            "{}|{}|{}|{}",
            take_chars(&title, TITLE_CHARS),
            take_chars(&surname, SURNAME_CHARS),
            year.unwrap_or(0),
            take_chars(&venue, VENUE_CHARS),
        );
        let digest = format!("{:x}", Sha256::digest(key.as_bytes()));
        Self(digest[..16].to_string())
    }

    /// Fingerprint for a candidate record.
    #[must_use]
    pub fn of_record(record: &CandidateRecord) -> Self {
        Self::compute(&record.title, record.first_author(), record.year, record.venue.as_deref())
    }

    /// Fingerprint for a canonical paper's current merged fields.
    #[must_use]
    pub fn of_paper(paper: &CanonicalPaper) -> Self {
        Self::compute(&paper.title, paper.first_author(), paper.year, paper.venue.as_deref())
    }

    /// The 16-character hex key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalize a title for identity comparison: lowercase, punctuation
/// stripped, whitespace collapsed.
#[must_use]
pub fn normalize_title(title: &str) -> String {
    let stripped: String = title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extract a first author's surname: the segment before the first comma,
/// else the last whitespace-separated token.
#[must_use]
pub fn first_author_surname(author: &str) -> String {
    let surname = match author.split_once(',') {
        Some((last, _)) => last.trim(),
        None => author.split_whitespace().last().unwrap_or(""),
    };
    surname.to_lowercase()
}

/// Normalize a DOI: trim, strip `doi.org` URL forms and the `doi:` prefix,
/// lowercase.
#[must_use]
pub fn normalize_doi(doi: &str) -> String {
    let trimmed = doi.trim();
    let rest = match url::Url::parse(trimmed) {
        Ok(u) if u.host_str().is_some_and(|h| h.ends_with("doi.org")) => {
            u.path().trim_start_matches('/').to_string()
        }
        _ => trimmed.to_string(),
    };
    let lowered = rest.to_lowercase();
    lowered.strip_prefix("doi:").unwrap_or(&lowered).trim().to_string()
}

/// Normalize an arXiv id: trim, strip the `arxiv:` prefix, lowercase.
#[must_use]
pub fn normalize_arxiv_id(id: &str) -> String {
    let lowered = id.trim().to_lowercase();
    lowered.strip_prefix("arxiv:").unwrap_or(&lowered).trim().to_string()
}

/// Check the canonical `10.NNNN/suffix` DOI shape.
#[must_use]
pub fn is_well_formed_doi(doi: &str) -> bool {
    let doi_re = Regex::new(r"^10\.\d{4,}/\S+$").expect("valid DOI pattern");
    doi_re.is_match(doi)
}

fn take_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_ignores_case_and_punctuation() {
        let a = Fingerprint::compute(
            "Deep Learning for Bearing Fault Diagnosis!",
            Some("Zhang, Wei"),
            Some(2022),
            Some("IEEE Access"),
        );
        let b = Fingerprint::compute(
            "deep learning for bearing fault diagnosis",
            Some("Wei Zhang"),
            Some(2022),
            Some("ieee access"),
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_fingerprint_distinguishes_years() {
        let a = Fingerprint::compute("Same title here", Some("Zhang, Wei"), Some(2021), None);
        let b = Fingerprint::compute("Same title here", Some("Zhang, Wei"), Some(2022), None);
        assert_ne!(a, b);
    }

    #[test]
    fn test_surname_extraction() {
        assert_eq!(first_author_surname("Zhang, Wei"), "zhang");
        assert_eq!(first_author_surname("Wei Zhang"), "zhang");
        assert_eq!(first_author_surname("  Cher "), "cher");
        assert_eq!(first_author_surname(""), "");
    }

    #[test]
    fn test_normalize_title_collapses_whitespace() {
        assert_eq!(
            normalize_title("  A   CNN-based\tapproach! "),
            // hyphen is stripped, not replaced
            "a cnnbased approach"
        );
    }

    #[test]
    fn test_normalize_doi_strips_url_and_prefix() {
        assert_eq!(normalize_doi("https://doi.org/10.1016/J.YMSSP.2022.1"), "10.1016/j.ymssp.2022.1");
        assert_eq!(normalize_doi("http://dx.doi.org/10.1016/x"), "10.1016/x");
        assert_eq!(normalize_doi("DOI:10.1016/x"), "10.1016/x");
        assert_eq!(normalize_doi(" 10.1016/x "), "10.1016/x");
    }

    #[test]
    fn test_well_formed_doi() {
        assert!(is_well_formed_doi("10.1016/j.ymssp.2022.109605"));
        assert!(!is_well_formed_doi("10.16/short-prefix"));
        assert!(!is_well_formed_doi("10.1016/has whitespace"));
        assert!(!is_well_formed_doi("not-a-doi"));
    }

    #[test]
    fn test_arxiv_normalization() {
        assert_eq!(normalize_arxiv_id("arXiv:2101.12345"), "2101.12345");
        assert_eq!(normalize_arxiv_id(" 2101.12345 "), "2101.12345");
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        // multi-byte characters must not split
        let title = "é".repeat(150);
        let fp = Fingerprint::compute(&title, None, None, None);
        assert_eq!(fp.as_str().len(), 16);
    }
}
