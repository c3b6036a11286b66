//! Property-based tests for identity resolution and scoring.

use paper_curator::Config;
use paper_curator::ident::{Fingerprint, IdentityResolver, is_well_formed_doi, normalize_doi};
use paper_curator::models::{CandidateRecord, CanonicalPaper};
use paper_curator::pipeline::Scorer;
use proptest::prelude::*;

/// Generate arbitrary candidate records for resolution testing.
fn arb_candidate() -> impl Strategy<Value = CandidateRecord> {
    (
        "[A-Za-z0-9 ]{1,80}",                                      // title
        proptest::option::of("[A-Z][a-z]{1,12} [A-Z][a-z]{1,12}"), // author
        proptest::option::of(1900i32..2030),                       // year
        proptest::option::of("[A-Za-z ]{3,40}"),                   // venue
        proptest::option::of("10\\.[0-9]{4}/[a-z0-9.]{1,20}"),     // doi
        0u32..100_000,                                             // citation_count
        "(openalex|crossref|semantic_scholar)",                    // source
    )
        .prop_map(|(title, author, year, venue, doi, citation_count, source)| CandidateRecord {
            title,
            authors: author.into_iter().collect(),
            year,
            venue,
            doi,
            citation_count,
            source,
            ..Default::default()
        })
}

proptest! {
    /// Every candidate either founds a canonical paper or merges into one.
    #[test]
    fn resolution_conserves_candidates(
        records in prop::collection::vec(arb_candidate(), 0..40),
    ) {
        let total = records.len();
        let resolution = IdentityResolver::new(0.9).resolve(records);

        prop_assert_eq!(resolution.papers.len() + resolution.merged, total);
        prop_assert!(resolution.ambiguous <= resolution.papers.len());
    }

    /// Canonical ids stay unique within a batch.
    #[test]
    fn resolution_ids_are_unique(
        records in prop::collection::vec(arb_candidate(), 0..40),
    ) {
        let resolution = IdentityResolver::new(0.9).resolve(records);

        let mut ids: Vec<&str> = resolution.papers.iter().map(|p| p.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        prop_assert_eq!(ids.len(), resolution.papers.len());
    }

    /// Two records sharing a DOI land in the same paper, whatever the titles
    /// look like and however the DOI is written.
    #[test]
    fn shared_doi_always_merges(
        mut a in arb_candidate(),
        mut b in arb_candidate(),
        doi in "10\\.[0-9]{4}/[a-z0-9.]{1,20}",
    ) {
        a.doi = Some(doi.clone());
        b.doi = Some(format!("https://doi.org/{}", doi.to_uppercase()));

        let resolution = IdentityResolver::new(0.9).resolve(vec![a, b]);
        prop_assert_eq!(resolution.papers.len(), 1);
        prop_assert_eq!(resolution.merged, 1);
        prop_assert_eq!(resolution.papers[0].doi.as_deref(), Some(doi.as_str()));
    }

    /// Fingerprints ignore case, punctuation, and surrounding whitespace.
    #[test]
    fn fingerprint_ignores_case_and_punctuation(
        title in "[a-z0-9 ]{10,80}",
        author in proptest::option::of("[A-Z][a-z]{1,12} [A-Z][a-z]{1,12}"),
        year in proptest::option::of(1900i32..2030),
    ) {
        let decorated = format!("  {}! ", title.to_uppercase());

        let a = Fingerprint::compute(&title, author.as_deref(), year, None);
        let b = Fingerprint::compute(&decorated, author.as_deref(), year, None);
        prop_assert_eq!(a, b);
    }

    /// DOI normalization is idempotent and lands on the canonical shape for
    /// every common way of writing a DOI.
    #[test]
    fn doi_normalization_idempotent(
        body in "10\\.[0-9]{4}/[a-z0-9.]{1,20}",
        wrapper in 0usize..4,
    ) {
        let raw = match wrapper {
            0 => body.clone(),
            1 => format!("doi:{}", body.to_uppercase()),
            2 => format!("https://doi.org/{body}"),
            _ => format!("  http://dx.doi.org/{body} "),
        };

        let once = normalize_doi(&raw);
        prop_assert_eq!(&once, &body);
        prop_assert_eq!(normalize_doi(&once), once.clone());
        prop_assert!(is_well_formed_doi(&once));
    }

    /// Every score term stays inside the unit interval; the composite is
    /// finite, bounded, and bit-for-bit deterministic.
    #[test]
    fn score_terms_bounded(
        title in "[A-Za-z0-9 ]{0,100}",
        abstract_text in proptest::option::of("[A-Za-z0-9 .,]{0,300}"),
        year in proptest::option::of(1900i32..2030),
        venue in proptest::option::of("[A-Za-z ]{0,40}"),
        citations in 0u32..1_000_000,
    ) {
        let record = CandidateRecord {
            title,
            r#abstract: abstract_text,
            year,
            venue,
            citation_count: citations,
            source: "openalex".to_string(),
            ..Default::default()
        };
        let paper = CanonicalPaper::from_candidate("p1".to_string(), record);
        let scorer = Scorer::with_current_year(&Config::default(), 2026);

        let score = scorer.score(&paper);
        for term in [score.relevance, score.citation_impact, score.recency, score.venue_quality] {
            prop_assert!((0.0..=1.0).contains(&term), "term out of range: {}", term);
        }
        prop_assert!(score.value.is_finite());
        prop_assert!((0.0..=1.0).contains(&score.value));

        let again = scorer.score(&paper);
        prop_assert_eq!(score.value.to_bits(), again.value.to_bits());
    }
}

#[test]
fn empty_batch_resolves_to_nothing() {
    let resolution = IdentityResolver::new(0.9).resolve(Vec::new());
    assert!(resolution.papers.is_empty());
    assert_eq!(resolution.merged, 0);
    assert_eq!(resolution.ambiguous, 0);
}

#[test]
fn bare_doi_passes_through_normalization() {
    assert_eq!(normalize_doi("10.1016/j.ymssp.2022.109605"), "10.1016/j.ymssp.2022.109605");
}

#[test]
fn fingerprint_of_degenerate_titles_is_still_sixteen_hex_chars() {
    for title in ["", " ", "!!!", "é"] {
        let fp = Fingerprint::compute(title, None, None, None);
        assert_eq!(fp.as_str().len(), 16);
        assert!(fp.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }
}
