//! Markdown report formatting.

use std::borrow::Cow;
use std::collections::HashMap;

use crate::models::{PipelineReport, RankedPaper, RelatedPaper};
use crate::tables::VenueTier;

/// Longest abstract preview, in characters.
const ABSTRACT_PREVIEW_CHARS: usize = 300;

/// Format a full batch report as Markdown.
#[must_use]
pub fn format_report_markdown(report: &PipelineReport) -> String {
    if report.is_empty() {
        return format!("# Curation report: \"{}\"\n\nNo papers found.\n", report.query);
    }

    let mut output = format!(
        "# Curation report: \"{}\" ({} papers)\n\n",
        report.query,
        report.papers.len()
    );
    output.push_str(&format!(
        "**Run**: {} | **Generated**: {} | **Resolved**: {} ({} ambiguous)\n\n",
        report.run_id,
        report.generated_at.format("%Y-%m-%d %H:%M UTC"),
        report.resolved,
        report.ambiguous,
    ));

    // Neighbor lists carry ids; resolve them to titles for display.
    let titles: HashMap<&str, &str> = report
        .papers
        .iter()
        .map(|entry| (entry.paper.id.as_str(), entry.paper.title.as_str()))
        .collect();

    for (i, entry) in report.papers.iter().enumerate() {
        let related = report.related.get(&entry.paper.id).map_or(&[][..], Vec::as_slice);
        output.push_str(&format_ranked_paper(entry, related, &titles, i + 1));
        output.push_str("\n---\n\n");
    }

    output.push_str(&format_stats_markdown(report));
    output
}

/// Format a single ranked paper as a Markdown section.
fn format_ranked_paper(
    entry: &RankedPaper,
    related: &[RelatedPaper],
    titles: &HashMap<&str, &str>,
    index: usize,
) -> String {
    let paper = &entry.paper;
    let mut output = String::new();

    // Title
    output.push_str(&format!("## {}. {}\n\n", index, paper.title));

    // Authors
    if !paper.authors.is_empty() {
        output.push_str(&format!("**Authors**: {}\n\n", paper.author_names()));
    }

    // Year, citations, venue
    let mut meta = Vec::new();
    if let Some(year) = paper.year {
        meta.push(format!("**Year**: {year}"));
    }
    meta.push(format!(
        "**Citations**: {} ({})",
        paper.citation_count,
        entry.citation_impact.label()
    ));
    if let Some(venue) = &paper.venue {
        if entry.venue_tier == VenueTier::Unknown {
            meta.push(format!("**Venue**: {venue}"));
        } else {
            meta.push(format!("**Venue**: {venue} ({})", entry.venue_tier.label()));
        }
    }
    output.push_str(&format!("{}\n\n", meta.join(" | ")));

    // Score with term breakdown
    output.push_str(&format!(
        "**Score**: {:.3} ({} tier) | relevance {:.2}, citations {:.2}, recency {:.2}, venue {:.2}\n\n",
        entry.score.value,
        entry.relevance_tier.label(),
        entry.score.relevance,
        entry.score.citation_impact,
        entry.score.recency,
        entry.score.venue_quality,
    ));

    if !entry.categories.is_empty() {
        output.push_str(&format!("**Categories**: {}\n\n", entry.categories.join(", ")));
    }

    let mut tags = Vec::new();
    if !entry.methodologies.is_empty() {
        tags.push(format!("**Methods**: {}", entry.methodologies.join(", ")));
    }
    if !entry.application_domains.is_empty() {
        tags.push(format!("**Domains**: {}", entry.application_domains.join(", ")));
    }
    if !tags.is_empty() {
        output.push_str(&format!("{}\n\n", tags.join(" | ")));
    }

    // External IDs
    let mut ids = Vec::new();
    if let Some(doi) = paper.doi.as_deref() {
        ids.push(format!("[DOI](https://doi.org/{doi})"));
    }
    if let Some(arxiv) = paper.arxiv_id.as_deref() {
        ids.push(format!("[arXiv](https://arxiv.org/abs/{arxiv})"));
    }
    if !ids.is_empty() {
        output.push_str(&format!("**Links**: {}\n\n", ids.join(" | ")));
    }

    if !related.is_empty() {
        let neighbors = related
            .iter()
            .map(|r| {
                let title = titles.get(r.id.as_str()).copied().unwrap_or(r.id.as_str());
                format!("{} ({:.2})", title, r.weight)
            })
            .collect::<Vec<_>>();
        output.push_str(&format!("**Related**: {}\n\n", neighbors.join("; ")));
    }

    // Abstract (truncated)
    if let Some(abs) = paper.r#abstract.as_deref() {
        output.push_str(&format!(
            "**Abstract**: {}\n",
            truncate_chars(abs, ABSTRACT_PREVIEW_CHARS)
        ));
    }

    output
}

fn format_stats_markdown(report: &PipelineReport) -> String {
    let mut output = String::from("## Source statistics\n\n");
    for (name, stats) in &report.stats.sources {
        output.push_str(&format!(
            "- {}: {} requests, {} ok, {} failed, {} records\n",
            name, stats.requests, stats.successes, stats.failures, stats.records_found
        ));
    }
    output.push_str(&format!(
        "\n{} candidates, {} dropped as invalid",
        report.stats.candidates, report.stats.dropped_invalid
    ));
    if report.stats.terminated_early {
        output.push_str(", stopped at the oversample bound");
    }
    output.push('\n');
    output
}

/// Truncate on a character boundary so multibyte text never splits.
fn truncate_chars(text: &str, limit: usize) -> Cow<'_, str> {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => Cow::Owned(format!("{}...", &text[..cut])),
        None => Cow::Borrowed(text),
    }
}
