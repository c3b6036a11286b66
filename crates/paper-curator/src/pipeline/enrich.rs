//! Optional metadata enrichment between resolution and scoring.

use async_trait::async_trait;

use crate::config::Config;
use crate::error::PipelineResult;
use crate::models::CanonicalPaper;
use crate::tables::{Concept, KeywordGroup};

/// Keywords added to a single paper by extraction.
const MAX_EXTRACTED: usize = 10;

/// A post-resolution enrichment pass over the resolved papers.
///
/// The pipeline runs fine with no enricher configured, and an enricher
/// failure downgrades to a warning rather than aborting the run.
#[async_trait]
pub trait Enricher: Send + Sync {
    /// Enricher name for logging.
    fn name(&self) -> &'static str;

    /// Enrich the resolved papers in place.
    ///
    /// # Errors
    ///
    /// Returns an error when enrichment cannot proceed; the caller logs it
    /// and continues with the papers as they are.
    async fn enrich(&self, papers: &mut [CanonicalPaper]) -> PipelineResult<()>;
}

/// Fills empty keyword lists by scanning title and abstract text against the
/// configured concept and methodology vocabularies.
///
/// Papers that already carry keywords are left untouched.
pub struct KeywordExtractor {
    pool: Vec<String>,
}

impl KeywordExtractor {
    /// Build an extractor from keyword vocabularies.
    ///
    /// Pool order follows table order, so extraction output is deterministic.
    #[must_use]
    pub fn new(concepts: &[Concept], methodologies: &[KeywordGroup]) -> Self {
        let mut pool: Vec<String> = Vec::new();
        for keyword in concepts
            .iter()
            .flat_map(|c| c.keywords.iter())
            .chain(methodologies.iter().flat_map(|g| g.keywords.iter()))
        {
            if !pool.contains(keyword) {
                pool.push(keyword.clone());
            }
        }
        Self { pool }
    }

    /// Build an extractor from the pipeline configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.concepts, &config.methodologies)
    }
}

#[async_trait]
impl Enricher for KeywordExtractor {
    fn name(&self) -> &'static str {
        "keyword_extractor"
    }

    async fn enrich(&self, papers: &mut [CanonicalPaper]) -> PipelineResult<()> {
        for paper in papers.iter_mut().filter(|p| p.keywords.is_empty()) {
            let mut text = paper.title.to_lowercase();
            if let Some(abstract_text) = &paper.r#abstract {
                text.push(' ');
                text.push_str(&abstract_text.to_lowercase());
            }

            paper.keywords = self
                .pool
                .iter()
                .filter(|keyword| text.contains(keyword.as_str()))
                .take(MAX_EXTRACTED)
                .cloned()
                .collect();
        }
        Ok(())
    }
}
