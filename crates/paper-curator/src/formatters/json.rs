//! JSON output formatting with token efficiency.

use serde_json::{Value, json};

use crate::models::{PipelineReport, RankedPaper};

/// Create a compact report representation for JSON output.
///
/// Keeps run metadata, per-paper summaries, and the similarity graph while
/// dropping the full scoring breakdowns. Serialize the [`PipelineReport`]
/// itself for the complete view.
#[must_use]
pub fn compact_report(report: &PipelineReport) -> Value {
    let mut obj = json!({
        "runId": report.run_id,
        "generatedAt": report.generated_at.to_rfc3339(),
        "query": report.query,
        "resolved": report.resolved,
        "papers": report.papers.iter().map(compact_paper).collect::<Vec<_>>(),
    });

    if report.ambiguous > 0 {
        obj["ambiguous"] = json!(report.ambiguous);
    }

    if !report.edges.is_empty() {
        obj["edges"] = json!(
            report
                .edges
                .iter()
                .map(|e| json!({"a": e.a, "b": e.b, "weight": e.weight}))
                .collect::<Vec<_>>()
        );
    }

    obj
}

/// Create a compact paper representation for JSON output.
#[must_use]
pub fn compact_paper(entry: &RankedPaper) -> Value {
    let paper = &entry.paper;
    let mut obj = json!({
        "id": paper.id,
        "title": paper.title,
        "year": paper.year,
        "citations": paper.citation_count,
        "score": entry.score.value,
        "tier": entry.relevance_tier,
    });

    // Add authors as names only
    if !paper.authors.is_empty() {
        obj["authors"] = json!(paper.authors);
    }

    // Add optional fields only if present
    if let Some(venue) = &paper.venue {
        obj["venue"] = json!(venue);
    }

    if let Some(doi) = &paper.doi {
        obj["doi"] = json!(doi);
    }

    if let Some(arxiv) = &paper.arxiv_id {
        obj["arxiv"] = json!(arxiv);
    }

    if !entry.categories.is_empty() {
        obj["categories"] = json!(entry.categories);
    }

    if !entry.methodologies.is_empty() {
        obj["methods"] = json!(entry.methodologies);
    }

    if !entry.application_domains.is_empty() {
        obj["domains"] = json!(entry.application_domains);
    }

    obj
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::{
        AggregationStats, CanonicalPaper, CandidateRecord, CitationImpact, CompositeScore,
        RelevanceTier, SimilarityEdge, SimilarityFactors,
    };
    use crate::tables::VenueTier;

    fn ranked(id: &str, score: f64) -> RankedPaper {
        let record = CandidateRecord {
            title: "Bearing fault diagnosis with CNNs".to_string(),
            authors: vec!["Wei Zhang".to_string()],
            year: Some(2023),
            citation_count: 42,
            source: "openalex".to_string(),
            source_priority: 5,
            ..Default::default()
        };
        RankedPaper {
            paper: CanonicalPaper::from_candidate(id.to_string(), record),
            score: CompositeScore { value: score, ..Default::default() },
            relevance_tier: RelevanceTier::from_score(score),
            citation_impact: CitationImpact::from_count(42),
            venue_tier: VenueTier::Unknown,
            categories: vec!["deep-learning".to_string()],
            methodologies: Vec::new(),
            application_domains: Vec::new(),
            completeness: 0.5,
        }
    }

    #[test]
    fn test_compact_paper() {
        let compact = compact_paper(&ranked("p1", 0.72));

        assert_eq!(compact["id"], "p1");
        assert_eq!(compact["title"], "Bearing fault diagnosis with CNNs");
        assert_eq!(compact["year"], 2023);
        assert_eq!(compact["citations"], 42);
        assert_eq!(compact["tier"], "high");
        assert_eq!(compact["authors"], json!(["Wei Zhang"]));
        assert_eq!(compact["categories"], json!(["deep-learning"]));
        // absent optionals stay absent
        assert!(compact.get("venue").is_none());
        assert!(compact.get("doi").is_none());
        assert!(compact.get("methods").is_none());
    }

    #[test]
    fn test_compact_report_edges_only_when_present() {
        let mut report = PipelineReport {
            run_id: "run-1".to_string(),
            generated_at: Utc::now(),
            query: "bearing fault diagnosis".to_string(),
            stats: AggregationStats::default(),
            resolved: 2,
            ambiguous: 0,
            papers: vec![ranked("p1", 0.72), ranked("p2", 0.61)],
            edges: Vec::new(),
            related: std::collections::BTreeMap::new(),
            categories: std::collections::BTreeMap::new(),
        };

        let compact = compact_report(&report);
        assert!(compact.get("edges").is_none());
        assert!(compact.get("ambiguous").is_none());
        assert_eq!(compact["papers"].as_array().map(Vec::len), Some(2));

        report.edges.push(SimilarityEdge::new("p1", "p2", 0.44, SimilarityFactors::default()));
        let compact = compact_report(&report);
        assert_eq!(compact["edges"][0]["weight"], 0.44);
    }
}
