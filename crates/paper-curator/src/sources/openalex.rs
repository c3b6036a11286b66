//! OpenAlex source adapter.
//!
//! Queries the OpenAlex works endpoint and maps each work into a
//! [`CandidateRecord`]. Abstracts arrive as an inverted index (word to
//! positions) and are reconstructed into plain text here.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::Config;
use crate::error::SourceResult;
use crate::ident::normalize_doi;
use crate::models::CandidateRecord;
use crate::sources::{HttpClient, SourceAdapter, YearRange};

/// Hard cap on `per-page` accepted by the works endpoint.
const MAX_PER_PAGE: usize = 200;

/// Concepts above this level are too specific to use as keywords.
const MAX_CONCEPT_LEVEL: u8 = 2;

/// Keywords kept per record.
const MAX_KEYWORDS: usize = 10;

/// Adapter for the OpenAlex works API.
#[derive(Debug, Clone)]
pub struct OpenAlexAdapter {
    http: HttpClient,
    base_url: String,
    mailto: Option<String>,
}

impl OpenAlexAdapter {
    /// Create an adapter from the pipeline configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if HTTP client initialization fails.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            http: HttpClient::new(config, None)?,
            base_url: config.openalex_url.trim_end_matches('/').to_string(),
            mailto: config.mailto.clone(),
        })
    }
}

#[async_trait]
impl SourceAdapter for OpenAlexAdapter {
    fn name(&self) -> &'static str {
        "openalex"
    }

    async fn search(
        &self,
        query: &str,
        limit: usize,
        year_range: Option<YearRange>,
    ) -> SourceResult<Vec<CandidateRecord>> {
        let url = format!("{}/works", self.base_url);

        let mut params = vec![
            ("search".to_string(), query.to_string()),
            ("per-page".to_string(), limit.min(MAX_PER_PAGE).to_string()),
            ("sort".to_string(), "cited_by_count:desc".to_string()),
        ];
        if let Some((start, end)) = year_range {
            params.push(("filter".to_string(), format!("publication_year:{start}-{end}")));
        }
        if let Some(mailto) = &self.mailto {
            params.push(("mailto".to_string(), mailto.clone()));
        }

        let response: WorksResponse = self.http.get_json(&url, &params).await?;
        Ok(response.results.into_iter().map(Work::into_candidate).collect())
    }
}

#[derive(Debug, Deserialize)]
struct WorksResponse {
    #[serde(default)]
    results: Vec<Work>,
}

#[derive(Debug, Deserialize)]
struct Work {
    display_name: Option<String>,
    doi: Option<String>,
    publication_year: Option<i32>,
    #[serde(default)]
    cited_by_count: i64,
    #[serde(default)]
    authorships: Vec<Authorship>,
    primary_location: Option<Location>,
    #[serde(default)]
    concepts: Vec<WorkConcept>,
    abstract_inverted_index: Option<HashMap<String, Vec<u32>>>,
}

#[derive(Debug, Deserialize)]
struct Authorship {
    author: Option<Author>,
}

#[derive(Debug, Deserialize)]
struct Author {
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Location {
    source: Option<LocationSource>,
}

#[derive(Debug, Deserialize)]
struct LocationSource {
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WorkConcept {
    display_name: Option<String>,
    #[serde(default)]
    level: u8,
}

impl Work {
    fn into_candidate(self) -> CandidateRecord {
        let authors = self
            .authorships
            .into_iter()
            .filter_map(|a| a.author.and_then(|author| author.display_name))
            .collect();

        let keywords = self
            .concepts
            .into_iter()
            .filter(|c| c.level <= MAX_CONCEPT_LEVEL)
            .filter_map(|c| c.display_name)
            .take(MAX_KEYWORDS)
            .collect();

        CandidateRecord {
            title: self.display_name.unwrap_or_default(),
            authors,
            year: self.publication_year,
            venue: self.primary_location.and_then(|l| l.source).and_then(|s| s.display_name),
            doi: self.doi.as_deref().map(normalize_doi),
            arxiv_id: None,
            r#abstract: self.abstract_inverted_index.and_then(reconstruct_abstract),
            keywords,
            citation_count: u32::try_from(self.cited_by_count.max(0)).unwrap_or(u32::MAX),
            source: "openalex".to_string(),
            source_priority: 0,
        }
    }
}

/// Rebuild abstract text from an inverted index.
///
/// Positions are globally unique in practice; when a position repeats, the
/// last word seen wins.
fn reconstruct_abstract(index: HashMap<String, Vec<u32>>) -> Option<String> {
    let mut positions: BTreeMap<u32, &str> = BTreeMap::new();
    for (word, occurrences) in &index {
        for &pos in occurrences {
            positions.insert(pos, word);
        }
    }

    if positions.is_empty() {
        return None;
    }

    Some(positions.into_values().collect::<Vec<_>>().join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconstruct_abstract_orders_by_position() {
        let mut index = HashMap::new();
        index.insert("diagnosis".to_string(), vec![2]);
        index.insert("bearing".to_string(), vec![0]);
        index.insert("fault".to_string(), vec![1, 3]);

        let text = reconstruct_abstract(index).unwrap();
        assert_eq!(text, "bearing fault diagnosis fault");
    }

    #[test]
    fn test_reconstruct_abstract_empty_index() {
        assert!(reconstruct_abstract(HashMap::new()).is_none());
    }

    #[test]
    fn test_work_mapping() {
        let json = serde_json::json!({
            "display_name": "Bearing fault diagnosis with CNNs",
            "doi": "https://doi.org/10.1016/j.ymssp.2023.110001",
            "publication_year": 2023,
            "cited_by_count": 42,
            "authorships": [
                {"author": {"display_name": "Wei Zhang"}},
                {"author": {"display_name": "Li Chen"}},
                {"author": null}
            ],
            "primary_location": {
                "source": {"display_name": "Mechanical Systems and Signal Processing"}
            },
            "concepts": [
                {"display_name": "Engineering", "level": 0},
                {"display_name": "Fault detection", "level": 2},
                {"display_name": "Squirrel-cage rotor", "level": 4}
            ]
        });

        let work: Work = serde_json::from_value(json).unwrap();
        let record = work.into_candidate();

        assert_eq!(record.title, "Bearing fault diagnosis with CNNs");
        assert_eq!(record.doi.as_deref(), Some("10.1016/j.ymssp.2023.110001"));
        assert_eq!(record.authors, vec!["Wei Zhang", "Li Chen"]);
        assert_eq!(record.venue.as_deref(), Some("Mechanical Systems and Signal Processing"));
        assert_eq!(record.citation_count, 42);
        // Level-4 concept filtered out
        assert_eq!(record.keywords, vec!["Engineering", "Fault detection"]);
        assert_eq!(record.source, "openalex");
    }

    #[test]
    fn test_negative_citation_count_clamped() {
        let json = serde_json::json!({
            "display_name": "A paper",
            "cited_by_count": -1
        });
        let work: Work = serde_json::from_value(json).unwrap();
        assert_eq!(work.into_candidate().citation_count, 0);
    }
}
