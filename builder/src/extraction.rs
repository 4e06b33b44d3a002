//! Concept extraction from document text.
//!
//! The pipeline depends on [`ConceptExtractor`] only. [`KeywordExtractor`]
//! is a fixed-vocabulary substring scan; any extractor honouring the same
//! contract can replace it.

use tracing::debug;

use crate::config::ExtractionConfig;
use crate::error::Result;

/// Extracts concept labels from a document.
///
/// Labels need not be unique: duplicates are absorbed by node merging and
/// relationship reinforcement.
pub trait ConceptExtractor: Send + Sync {
    fn extract(&self, text: &str, title: &str) -> Result<Vec<String>>;
}

/// Case-insensitive substring match against a known vocabulary.
///
/// Matches are reported in vocabulary order, each term at most once.
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    vocabulary: Vec<String>,
}

impl KeywordExtractor {
    /// Create an extractor over the given terms.
    ///
    /// Terms are lower-cased; blank and repeated terms are dropped, keeping
    /// the first occurrence.
    pub fn new(vocabulary: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let mut terms: Vec<String> = Vec::new();
        for term in vocabulary {
            let term = term.into().to_lowercase();
            if !term.trim().is_empty() && !terms.contains(&term) {
                terms.push(term);
            }
        }
        Self { vocabulary: terms }
    }

    /// Create an extractor from configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new(config.vocabulary.iter().cloned())
    }
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }
}

impl ConceptExtractor for KeywordExtractor {
    fn extract(&self, text: &str, _title: &str) -> Result<Vec<String>> {
        let text_lower = text.to_lowercase();
        let found: Vec<String> = self
            .vocabulary
            .iter()
            .filter(|term| text_lower.contains(term.as_str()))
            .cloned()
            .collect();

        debug!("Extracted {} concepts from text", found.len());
        Ok(found)
    }
}
