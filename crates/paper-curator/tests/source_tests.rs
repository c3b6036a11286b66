//! Mock-based source adapter tests using wiremock.
//!
//! These tests verify request shaping and response mapping against mocked
//! upstream APIs.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use paper_curator::Config;
use paper_curator::error::SourceError;
use paper_curator::sources::{
    CrossrefAdapter, OpenAlexAdapter, SemanticScholarAdapter, SourceAdapter,
};

/// Sample OpenAlex work JSON.
fn openalex_work(title: &str, year: i32, citations: i64) -> serde_json::Value {
    json!({
        "display_name": title,
        "doi": "https://doi.org/10.1016/j.ymssp.2023.110001",
        "publication_year": year,
        "cited_by_count": citations,
        "authorships": [{"author": {"display_name": "Wei Zhang"}}],
        "primary_location": {
            "source": {"display_name": "Mechanical Systems and Signal Processing"}
        },
        "concepts": [
            {"display_name": "Engineering", "level": 0},
            {"display_name": "Fault detection", "level": 2}
        ],
        "abstract_inverted_index": {"Bearing": [0], "degradation": [1], "observed": [2]}
    })
}

/// Sample Crossref item JSON.
fn crossref_item(title: &str, year: i32) -> serde_json::Value {
    json!({
        "DOI": "10.1109/TIE.2022.1234567",
        "title": [title],
        "author": [{"given": "Yaguo", "family": "Lei"}],
        "container-title": ["IEEE Transactions on Industrial Electronics"],
        "is-referenced-by-count": 87,
        "published-print": {"date-parts": [[year, 3]]},
        "abstract": "<jats:p>Vibration signals are analyzed.</jats:p>",
        "subject": ["Signal Processing"]
    })
}

/// Sample Semantic Scholar paper JSON.
fn s2_paper(title: &str, year: i32) -> serde_json::Value {
    json!({
        "title": title,
        "abstract": "We study remaining useful life.",
        "year": year,
        "venue": "Reliability Engineering & System Safety",
        "citationCount": 15,
        "externalIds": {"DOI": "10.1016/j.ress.2022.108333", "ArXiv": "2203.01234"},
        "authors": [{"name": "Min Xia"}],
        "fieldsOfStudy": ["Engineering"]
    })
}

// =============================================================================
// OpenAlex
// =============================================================================

#[tokio::test]
async fn test_openalex_search_maps_works() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/works"))
        .and(query_param("search", "bearing fault"))
        .and(query_param("per-page", "10"))
        .and(query_param("sort", "cited_by_count:desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [openalex_work("Bearing fault diagnosis with CNNs", 2023, 42)]
        })))
        .mount(&mock_server)
        .await;

    let adapter = OpenAlexAdapter::new(&Config::for_testing(&mock_server.uri())).unwrap();
    let records = adapter.search("bearing fault", 10, None).await.unwrap();

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.title, "Bearing fault diagnosis with CNNs");
    assert_eq!(record.doi.as_deref(), Some("10.1016/j.ymssp.2023.110001"));
    assert_eq!(record.authors, vec!["Wei Zhang"]);
    assert_eq!(record.r#abstract.as_deref(), Some("Bearing degradation observed"));
    assert_eq!(record.citation_count, 42);
    assert_eq!(record.source, "openalex");
}

#[tokio::test]
async fn test_openalex_year_filter_param() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/works"))
        .and(query_param("filter", "publication_year:2020-2024"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let adapter = OpenAlexAdapter::new(&Config::for_testing(&mock_server.uri())).unwrap();
    let records = adapter.search("test", 10, Some((2020, 2024))).await.unwrap();

    assert!(records.is_empty());
}

// =============================================================================
// Crossref
// =============================================================================

#[tokio::test]
async fn test_crossref_search_maps_items() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/works"))
        .and(query_param("query", "gearbox"))
        .and(query_param("rows", "5"))
        .and(query_param("filter", "type:journal-article"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": {"items": [crossref_item("Gearbox <i>prognosis</i> methods", 2022)]}
        })))
        .mount(&mock_server)
        .await;

    let adapter = CrossrefAdapter::new(&Config::for_testing(&mock_server.uri())).unwrap();
    let records = adapter.search("gearbox", 5, None).await.unwrap();

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.title, "Gearbox prognosis methods");
    assert_eq!(record.doi.as_deref(), Some("10.1109/tie.2022.1234567"));
    assert_eq!(record.authors, vec!["Yaguo Lei"]);
    assert_eq!(record.year, Some(2022));
    assert_eq!(record.r#abstract.as_deref(), Some("Vibration signals are analyzed."));
    assert_eq!(record.source, "crossref");
}

#[tokio::test]
async fn test_crossref_year_filter_param() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/works"))
        .and(query_param("filter", "type:journal-article,from-pub-date:2020,until-pub-date:2024"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"message": {"items": []}})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let adapter = CrossrefAdapter::new(&Config::for_testing(&mock_server.uri())).unwrap();
    let records = adapter.search("test", 10, Some((2020, 2024))).await.unwrap();

    assert!(records.is_empty());
}

// =============================================================================
// Semantic Scholar
// =============================================================================

#[tokio::test]
async fn test_semantic_scholar_search_maps_papers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/search"))
        .and(query_param("query", "remaining useful life"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 1,
            "data": [s2_paper("RUL prediction for turbofan engines", 2022)]
        })))
        .mount(&mock_server)
        .await;

    let adapter = SemanticScholarAdapter::new(&Config::for_testing(&mock_server.uri())).unwrap();
    let records = adapter.search("remaining useful life", 10, None).await.unwrap();

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.title, "RUL prediction for turbofan engines");
    assert_eq!(record.doi.as_deref(), Some("10.1016/j.ress.2022.108333"));
    assert_eq!(record.arxiv_id.as_deref(), Some("2203.01234"));
    assert_eq!(record.source, "semantic_scholar");
}

#[tokio::test]
async fn test_semantic_scholar_limit_capped_at_api_max() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/search"))
        .and(query_param("limit", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let adapter = SemanticScholarAdapter::new(&Config::for_testing(&mock_server.uri())).unwrap();
    let records = adapter.search("test", 500, None).await.unwrap();

    assert!(records.is_empty());
}

// =============================================================================
// Error handling
// =============================================================================

#[tokio::test]
async fn test_rate_limit_429_maps_to_retryable_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/search"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("Retry-After", "7")
                .set_body_string("Rate limit exceeded"),
        )
        .mount(&mock_server)
        .await;

    let adapter = SemanticScholarAdapter::new(&Config::for_testing(&mock_server.uri())).unwrap();
    let result = adapter.search("test", 10, None).await;

    match result {
        Err(SourceError::RateLimited { retry_after }) => {
            assert_eq!(retry_after, Duration::from_secs(7));
        }
        other => panic!("expected RateLimited, got {other:?}"),
    }
}

#[tokio::test]
async fn test_bad_request_400_fails_fast() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/works"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Invalid query parameter"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let adapter = OpenAlexAdapter::new(&Config::for_testing(&mock_server.uri())).unwrap();
    let result = adapter.search("test", 10, None).await;

    match result {
        Err(err @ SourceError::BadRequest { .. }) => assert!(!err.is_retryable()),
        other => panic!("expected BadRequest, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_json_response_is_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/works"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{ invalid json here"))
        .mount(&mock_server)
        .await;

    let adapter = OpenAlexAdapter::new(&Config::for_testing(&mock_server.uri())).unwrap();
    let result = adapter.search("test", 10, None).await;

    assert!(result.is_err(), "malformed body should surface as an error");
}

// =============================================================================
// Caching
// =============================================================================

#[tokio::test]
async fn test_identical_searches_hit_cache() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/works"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [openalex_work("Cached paper title here", 2023, 1)]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = Config::for_testing(&mock_server.uri());
    config.cache_ttl = Duration::from_secs(300);
    config.cache_max_size = 100;

    let adapter = OpenAlexAdapter::new(&config).unwrap();
    let first = adapter.search("cached", 10, None).await.unwrap();
    let second = adapter.search("cached", 10, None).await.unwrap();

    assert_eq!(first.len(), 1);
    assert_eq!(first[0].title, second[0].title);
}
