//! Candidate records as returned by source adapters.

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};

/// A raw bibliographic record from one source, prior to identity resolution.
///
/// Only the title and the source tag are guaranteed; every other field is
/// best-effort and may be missing or partial.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRecord {
    /// Paper title.
    pub title: String,

    /// Author display names, in publication order.
    #[serde(default)]
    pub authors: Vec<String>,

    /// Publication year.
    #[serde(default)]
    pub year: Option<i32>,

    /// Publication venue (journal or conference).
    #[serde(default)]
    pub venue: Option<String>,

    /// Digital Object Identifier, as reported by the source.
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

    /// Citation count at fetch time.
    #[serde(default)]
    pub citation_count: u32,

    /// Source tag, e.g. `openalex`.
    #[serde(default)]
    pub source: String,

    /// Source priority; higher wins merge conflicts and ranking ties.
    #[serde(default)]
    pub source_priority: u8,
}

impl CandidateRecord {
    /// Validate the record for ingestion.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the title is missing or shorter than
    /// `min_title_len` characters. Callers drop and count invalid records
    /// rather than propagating the error.
    pub fn validate(&self, min_title_len: usize) -> PipelineResult<()> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(PipelineError::validation("title", "missing"));
        }
        if title.chars().count() < min_title_len {
            return Err(PipelineError::validation(
                "title",
                format!("below minimum length {min_title_len}"),
            ));
        }
        Ok(())
    }

    /// First author's name, when present.
    #[must_use]
    pub fn first_author(&self) -> Option<&str> {
        self.authors.first().map(String::as_str)
    }

    /// True when the record carries a non-empty DOI.
    #[must_use]
    pub fn has_doi(&self) -> bool {
        self.doi.as_deref().is_some_and(|d| !d.is_empty())
    }
}
