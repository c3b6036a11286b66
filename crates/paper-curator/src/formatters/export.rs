//! Reference-manager export: BibTeX, RIS, and CSV.

use crate::models::{ExportFormat, RankedPaper};

/// Render ranked papers in the requested reference format.
#[must_use]
pub fn export_references(
    papers: &[RankedPaper],
    format: ExportFormat,
    include_abstract: bool,
) -> String {
    match format {
        ExportFormat::Bibtex => format_bibtex(papers, include_abstract),
        ExportFormat::Ris => format_ris(papers, include_abstract),
        ExportFormat::Csv => format_csv(papers, include_abstract),
    }
}

/// Format papers as BibTeX.
fn format_bibtex(papers: &[RankedPaper], include_abstract: bool) -> String {
    let mut output = String::new();

    for entry in papers {
        let paper = &entry.paper;
        let first_author = paper.first_author().unwrap_or("Unknown");
        let year = paper.year.unwrap_or(0);
        let key =
            format!("{}{}", first_author.split_whitespace().last().unwrap_or("Unknown"), year);

        output.push_str(&format!("@article{{{key},\n"));
        output.push_str(&format!("  title = {{{}}},\n", escape_bibtex(&paper.title)));
        output.push_str(&format!("  author = {{{}}},\n", escape_bibtex(&paper.author_names())));

        if year > 0 {
            output.push_str(&format!("  year = {{{year}}},\n"));
        }

        if let Some(venue) = paper.venue.as_deref() {
            output.push_str(&format!("  journal = {{{}}},\n", escape_bibtex(venue)));
        }

        if !paper.keywords.is_empty() {
            output.push_str(&format!(
                "  keywords = {{{}}},\n",
                escape_bibtex(&paper.keywords.join(", "))
            ));
        }

        if include_abstract {
            if let Some(abs) = paper.r#abstract.as_deref() {
                output.push_str(&format!("  abstract = {{{}}},\n", escape_bibtex(abs)));
            }
        }

        if let Some(doi) = paper.doi.as_deref() {
            output.push_str(&format!("  doi = {{{doi}}},\n"));
        }

        output.push_str("}\n\n");
    }

    output
}

/// Format papers as RIS.
fn format_ris(papers: &[RankedPaper], include_abstract: bool) -> String {
    let mut output = String::new();

    for entry in papers {
        let paper = &entry.paper;
        output.push_str("TY  - JOUR\n");
        output.push_str(&format!("TI  - {}\n", paper.title));

        for author in &paper.authors {
            output.push_str(&format!("AU  - {author}\n"));
        }

        if let Some(year) = paper.year {
            output.push_str(&format!("PY  - {year}\n"));
        }

        if let Some(venue) = paper.venue.as_deref() {
            output.push_str(&format!("JO  - {venue}\n"));
        }

        for keyword in &paper.keywords {
            output.push_str(&format!("KW  - {keyword}\n"));
        }

        if include_abstract {
            if let Some(abs) = paper.r#abstract.as_deref() {
                // RIS readers expect single-line abstracts
                let abs_clean = abs.replace('\r', "").replace('\n', " ");
                output.push_str(&format!("AB  - {abs_clean}\n"));
            }
        }

        if let Some(doi) = paper.doi.as_deref() {
            output.push_str(&format!("DO  - {doi}\n"));
        }

        output.push_str(&format!("ID  - {}\n", paper.id));
        output.push_str("ER  - \n\n");
    }

    output
}

/// Format papers as CSV.
fn format_csv(papers: &[RankedPaper], include_abstract: bool) -> String {
    let mut output = String::new();

    // Header
    if include_abstract {
        output.push_str("id,title,authors,year,venue,citations,score,doi,abstract\n");
    } else {
        output.push_str("id,title,authors,year,venue,citations,score,doi\n");
    }

    for entry in papers {
        let paper = &entry.paper;
        let title = csv_escape(&paper.title);
        let authors = csv_escape(&paper.author_names());
        let year = paper.year.map_or(String::new(), |y| y.to_string());
        let venue = csv_escape(paper.venue.as_deref().unwrap_or(""));
        let citations = paper.citation_count.to_string();
        let score = format!("{:.3}", entry.score.value);
        let doi = paper.doi.as_deref().unwrap_or("");

        if include_abstract {
            let abs = csv_escape(paper.r#abstract.as_deref().unwrap_or(""));
            output.push_str(&format!(
                "{},{title},{authors},{year},{venue},{citations},{score},{doi},{abs}\n",
                paper.id
            ));
        } else {
            output.push_str(&format!(
                "{},{title},{authors},{year},{venue},{citations},{score},{doi}\n",
                paper.id
            ));
        }
    }

    output
}

/// Escape a string for BibTeX output.
///
/// Single pass so replacement text is never re-escaped.
fn escape_bibtex(s: &str) -> String {
    let mut output = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => output.push_str("\\textbackslash{}"),
            '{' => output.push_str("\\{"),
            '}' => output.push_str("\\}"),
            '&' => output.push_str("\\&"),
            '%' => output.push_str("\\%"),
            '$' => output.push_str("\\$"),
            '#' => output.push_str("\\#"),
            '_' => output.push_str("\\_"),
            '^' => output.push_str("\\textasciicircum{}"),
            '~' => output.push_str("\\textasciitilde{}"),
            _ => output.push(c),
        }
    }
    output
}

/// Escape a string for CSV output.
fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        let escaped = s.replace('"', "\"\"");
        if escaped.starts_with('=')
            || escaped.starts_with('+')
            || escaped.starts_with('-')
            || escaped.starts_with('@')
        {
            format!("\"'{escaped}\"")
        } else {
            format!("\"{escaped}\"")
        }
    } else if s.starts_with('=') || s.starts_with('+') || s.starts_with('-') || s.starts_with('@') {
        // Prevent CSV injection in spreadsheet tools
        format!("'{s}")
    } else {
        s.to_string()
    }
}
