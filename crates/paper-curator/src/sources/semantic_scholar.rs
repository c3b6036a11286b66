//! Semantic Scholar source adapter.
//!
//! Queries the Graph API paper search endpoint. An API key raises the rate
//! limit but is not required.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::Config;
use crate::error::SourceResult;
use crate::ident::{normalize_arxiv_id, normalize_doi};
use crate::models::CandidateRecord;
use crate::sources::{HttpClient, SourceAdapter, YearRange};

/// Hard cap on `limit` accepted by the search endpoint.
const MAX_LIMIT: usize = 100;

/// Keywords kept per record.
const MAX_KEYWORDS: usize = 10;

/// Fields requested from the Graph API.
const SEARCH_FIELDS: &str = "title,abstract,year,venue,citationCount,externalIds,authors,fieldsOfStudy";

/// Adapter for the Semantic Scholar Graph API.
#[derive(Debug, Clone)]
pub struct SemanticScholarAdapter {
    http: HttpClient,
    base_url: String,
}

impl SemanticScholarAdapter {
    /// Create an adapter from the pipeline configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if HTTP client initialization fails.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            http: HttpClient::new(config, config.semantic_scholar_api_key.as_deref())?,
            base_url: config.semantic_scholar_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl SourceAdapter for SemanticScholarAdapter {
    fn name(&self) -> &'static str {
        "semantic_scholar"
    }

    async fn search(
        &self,
        query: &str,
        limit: usize,
        year_range: Option<YearRange>,
    ) -> SourceResult<Vec<CandidateRecord>> {
        let url = format!("{}/graph/v1/paper/search", self.base_url);

        let mut params = vec![
            ("query".to_string(), query.to_string()),
            ("limit".to_string(), limit.min(MAX_LIMIT).to_string()),
            ("fields".to_string(), SEARCH_FIELDS.to_string()),
        ];
        if let Some((start, end)) = year_range {
            params.push(("year".to_string(), format!("{start}-{end}")));
        }

        let response: SearchResponse = self.http.get_json(&url, &params).await?;
        Ok(response.data.into_iter().map(Paper::into_candidate).collect())
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<Paper>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Paper {
    title: Option<String>,
    #[serde(rename = "abstract")]
    abstract_text: Option<String>,
    year: Option<i32>,
    venue: Option<String>,
    #[serde(default)]
    citation_count: i64,
    external_ids: Option<HashMap<String, serde_json::Value>>,
    #[serde(default)]
    authors: Vec<PaperAuthor>,
    fields_of_study: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct PaperAuthor {
    name: Option<String>,
}

impl Paper {
    fn into_candidate(self) -> CandidateRecord {
        let ids = self.external_ids.unwrap_or_default();
        let doi = ids.get("DOI").and_then(serde_json::Value::as_str).map(normalize_doi);
        let arxiv_id = ids.get("ArXiv").and_then(serde_json::Value::as_str).map(normalize_arxiv_id);

        CandidateRecord {
            title: self.title.unwrap_or_default(),
            authors: self.authors.into_iter().filter_map(|a| a.name).collect(),
            year: self.year,
            venue: self.venue.filter(|v| !v.trim().is_empty()),
            doi,
            arxiv_id,
            r#abstract: self.abstract_text,
            keywords: self
                .fields_of_study
                .unwrap_or_default()
                .into_iter()
                .take(MAX_KEYWORDS)
                .collect(),
            citation_count: u32::try_from(self.citation_count.max(0)).unwrap_or(u32::MAX),
            source: "semantic_scholar".to_string(),
            source_priority: 0,
        }
    }
}
