//! Methodology and application-domain tagging.
//!
//! Labels come from the configured keyword tables and are emitted in table
//! order, so tagging is deterministic for a given configuration.

use crate::config::Config;
use crate::models::CanonicalPaper;
use crate::tables::KeywordGroup;

/// Tags papers with methodology and application-domain labels.
#[derive(Debug, Clone)]
pub struct Classifier {
    methodologies: Vec<KeywordGroup>,
    domains: Vec<KeywordGroup>,
}

impl Classifier {
    /// Create a classifier from the pipeline configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self { methodologies: config.methodologies.clone(), domains: config.domains.clone() }
    }

    /// Methodology labels for a paper.
    ///
    /// A group applies with two keyword matches anywhere in the searchable
    /// text, or a single match that appears in the title.
    #[must_use]
    pub fn methodologies(&self, paper: &CanonicalPaper) -> Vec<String> {
        let text = paper.searchable_text();
        let title = paper.title.to_lowercase();

        self.methodologies
            .iter()
            .filter(|group| {
                let matches =
                    group.keywords.iter().filter(|kw| text.contains(kw.as_str())).count();
                matches >= 2
                    || (matches == 1
                        && group.keywords.iter().any(|kw| title.contains(kw.as_str())))
            })
            .map(|group| group.label.clone())
            .collect()
    }

    /// Application-domain labels for a paper. A single match suffices.
    #[must_use]
    pub fn domains(&self, paper: &CanonicalPaper) -> Vec<String> {
        let text = paper.searchable_text();
        self.domains
            .iter()
            .filter(|group| group.keywords.iter().any(|kw| text.contains(kw.as_str())))
            .map(|group| group.label.clone())
            .collect()
    }
}
