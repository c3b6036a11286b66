//! Crossref source adapter.
//!
//! Queries the Crossref works endpoint. Titles and abstracts may carry JATS
//! or HTML markup, which is stripped before the record enters the pipeline.

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;

use crate::config::Config;
use crate::error::SourceResult;
use crate::ident::normalize_doi;
use crate::models::CandidateRecord;
use crate::sources::{HttpClient, SourceAdapter, YearRange};

/// Hard cap on `rows` accepted by the works endpoint.
const MAX_ROWS: usize = 1000;

/// Keywords kept per record.
const MAX_KEYWORDS: usize = 10;

/// Fields requested from the API, limited to what the record model carries.
const SELECT_FIELDS: &str = "DOI,title,author,published-print,published-online,\
                             container-title,abstract,subject,is-referenced-by-count";

/// Adapter for the Crossref works API.
#[derive(Debug, Clone)]
pub struct CrossrefAdapter {
    http: HttpClient,
    base_url: String,
}

impl CrossrefAdapter {
    /// Create an adapter from the pipeline configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if HTTP client initialization fails.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            http: HttpClient::new(config, None)?,
            base_url: config.crossref_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl SourceAdapter for CrossrefAdapter {
    fn name(&self) -> &'static str {
        "crossref"
    }

    async fn search(
        &self,
        query: &str,
        limit: usize,
        year_range: Option<YearRange>,
    ) -> SourceResult<Vec<CandidateRecord>> {
        let url = format!("{}/works", self.base_url);

        let mut filters = vec!["type:journal-article".to_string()];
        if let Some((start, end)) = year_range {
            filters.push(format!("from-pub-date:{start}"));
            filters.push(format!("until-pub-date:{end}"));
        }

        let params = vec![
            ("query".to_string(), query.to_string()),
            ("rows".to_string(), limit.min(MAX_ROWS).to_string()),
            ("sort".to_string(), "score".to_string()),
            ("order".to_string(), "desc".to_string()),
            ("select".to_string(), SELECT_FIELDS.to_string()),
            ("filter".to_string(), filters.join(",")),
        ];

        let response: WorksResponse = self.http.get_json(&url, &params).await?;
        Ok(response.message.items.into_iter().map(Item::into_candidate).collect())
    }
}

#[derive(Debug, Deserialize)]
struct WorksResponse {
    #[serde(default)]
    message: Message,
}

#[derive(Debug, Default, Deserialize)]
struct Message {
    #[serde(default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    #[serde(rename = "DOI")]
    doi: Option<String>,
    #[serde(default)]
    title: Vec<String>,
    #[serde(default)]
    author: Vec<ItemAuthor>,
    #[serde(rename = "container-title", default)]
    container_title: Vec<String>,
    #[serde(rename = "is-referenced-by-count", default)]
    is_referenced_by_count: i64,
    #[serde(rename = "published-print")]
    published_print: Option<DateParts>,
    #[serde(rename = "published-online")]
    published_online: Option<DateParts>,
    r#abstract: Option<String>,
    #[serde(default)]
    subject: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ItemAuthor {
    given: Option<String>,
    family: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DateParts {
    // Inner entries can be null in sparse records
    #[serde(rename = "date-parts", default)]
    date_parts: Vec<Vec<Option<i32>>>,
}

impl DateParts {
    fn year(&self) -> Option<i32> {
        self.date_parts.first().and_then(|parts| parts.first()).copied().flatten()
    }
}

impl ItemAuthor {
    fn full_name(self) -> Option<String> {
        match (self.given, self.family) {
            (Some(given), Some(family)) => Some(format!("{given} {family}")),
            (None, Some(family)) => Some(family),
            (Some(given), None) => Some(given),
            (None, None) => None,
        }
    }
}

impl Item {
    fn into_candidate(self) -> CandidateRecord {
        // Print date carries the citable year; online-first articles only
        // have the online date.
        let year = self
            .published_print
            .as_ref()
            .and_then(DateParts::year)
            .or_else(|| self.published_online.as_ref().and_then(DateParts::year));

        CandidateRecord {
            title: self.title.into_iter().next().map(|t| strip_markup(&t)).unwrap_or_default(),
            authors: self.author.into_iter().filter_map(ItemAuthor::full_name).collect(),
            year,
            venue: self.container_title.into_iter().next(),
            doi: self.doi.as_deref().map(normalize_doi),
            arxiv_id: None,
            r#abstract: self
                .r#abstract
                .map(|a| strip_markup(&a))
                .filter(|a| !a.is_empty()),
            keywords: self.subject.into_iter().take(MAX_KEYWORDS).collect(),
            citation_count: u32::try_from(self.is_referenced_by_count.max(0)).unwrap_or(u32::MAX),
            source: "crossref".to_string(),
            source_priority: 0,
        }
    }
}

/// Strip JATS/HTML tags and collapse whitespace.
fn strip_markup(text: &str) -> String {
    let tag_pattern = Regex::new(r"<[^>]+>").expect("valid tag pattern");
    let stripped = tag_pattern.replace_all(text, " ");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_markup_removes_jats_tags() {
        let input = "<jats:p>We propose a <jats:italic>novel</jats:italic> method.</jats:p>";
        assert_eq!(strip_markup(input), "We propose a novel method.");
    }

    #[test]
    fn test_strip_markup_collapses_whitespace() {
        assert_eq!(strip_markup("Deep   learning\n for  PHM"), "Deep learning for PHM");
    }

    #[test]
    fn test_year_prefers_print_date() {
        let json = serde_json::json!({
            "DOI": "10.1234/abc",
            "title": ["A title"],
            "published-print": {"date-parts": [[2021, 3]]},
            "published-online": {"date-parts": [[2020, 11]]}
        });
        let item: Item = serde_json::from_value(json).unwrap();
        assert_eq!(item.into_candidate().year, Some(2021));
    }

    #[test]
    fn test_year_falls_back_to_online_date() {
        let json = serde_json::json!({
            "title": ["A title"],
            "published-online": {"date-parts": [[2022]]}
        });
        let item: Item = serde_json::from_value(json).unwrap();
        assert_eq!(item.into_candidate().year, Some(2022));
    }

    #[test]
    fn test_item_mapping() {
        let json = serde_json::json!({
            "DOI": "10.1016/J.YMSSP.2022.109605",
            "title": ["Remaining useful life prediction of <i>rolling bearings</i>"],
            "author": [
                {"given": "Yaguo", "family": "Lei"},
                {"family": "Li"},
                {}
            ],
            "container-title": ["Mechanical Systems and Signal Processing"],
            "is-referenced-by-count": 87,
            "subject": ["Signal Processing", "Aerospace Engineering"],
            "abstract": "<jats:p>Bearing degradation is tracked over time.</jats:p>"
        });
        let item: Item = serde_json::from_value(json).unwrap();
        let record = item.into_candidate();

        assert_eq!(record.title, "Remaining useful life prediction of rolling bearings");
        assert_eq!(record.doi.as_deref(), Some("10.1016/j.ymssp.2022.109605"));
        assert_eq!(record.authors, vec!["Yaguo Lei", "Li"]);
        assert_eq!(record.citation_count, 87);
        assert_eq!(
            record.r#abstract.as_deref(),
            Some("Bearing degradation is tracked over time.")
        );
        assert_eq!(record.source, "crossref");
    }

    #[test]
    fn test_null_date_parts_tolerated() {
        let json = serde_json::json!({
            "title": ["A title"],
            "published-print": {"date-parts": [[null]]}
        });
        let item: Item = serde_json::from_value(json).unwrap();
        assert_eq!(item.into_candidate().year, None);
    }
}
