//! Configuration for a graph build.
//!
//! Every field has a default, so an empty TOML file (or no file at all) is a
//! valid configuration.
//!
//! ```toml
//! input_dir = "research_materials"
//!
//! [discovery]
//! extensions = ["pdf", "md", "txt"]
//!
//! [embedding]
//! provider = "openai"
//! model = "text-embedding-3-small"
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use kgraph_embeddings::{EmbeddingProvider, OpenAIProvider};
use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};

/// Name of the output directory created next to the input directory.
pub const DEFAULT_OUTPUT_DIR_NAME: &str = "knowledge_graph_output";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Directory scanned for documents.
    pub input_dir: Option<PathBuf>,

    /// Where snapshot artifacts are written.
    pub output_dir: Option<PathBuf>,

    pub discovery: DiscoveryConfig,

    pub extraction: ExtractionConfig,

    pub embedding: EmbeddingConfig,
}

impl GraphConfig {
    /// Load a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: GraphConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde cannot.
    pub fn validate(&self) -> Result<()> {
        if self.discovery.extensions.is_empty() {
            return Err(GraphError::InvalidConfig(
                "discovery.extensions must not be empty".to_string(),
            ));
        }
        if self.embedding.batch_size == 0 {
            return Err(GraphError::InvalidConfig(
                "embedding.batch_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Output directory, defaulting to a sibling of the input directory.
    pub fn resolve_output_dir(&self, input_dir: &Path) -> PathBuf {
        if let Some(dir) = &self.output_dir {
            return dir.clone();
        }
        match input_dir.parent() {
            Some(parent) => parent.join(DEFAULT_OUTPUT_DIR_NAME),
            None => input_dir.join(DEFAULT_OUTPUT_DIR_NAME),
        }
    }
}

/// Which files are picked up from the input directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// File extensions to process, in processing order.
    pub extensions: Vec<String>,

    /// Directory names to skip. Only the snapshot output directory by default.
    pub skip_directories: Vec<String>,

    /// Whether to include hidden files and directories.
    pub process_hidden: bool,

    /// Whether to descend into symlinked directories. Symlinked files are
    /// always picked up.
    pub follow_symlinks: bool,

    /// Files larger than this (bytes) fail to parse.
    pub max_file_size: u64,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["pdf".to_string(), "md".to_string(), "txt".to_string()],
            skip_directories: vec![DEFAULT_OUTPUT_DIR_NAME.to_string()],
            process_hidden: true,
            follow_symlinks: false,
            max_file_size: 50 * 1024 * 1024,
        }
    }
}

/// Concept extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Terms matched case-insensitively against document text.
    pub vocabulary: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            vocabulary: [
                "digital person",
                "soul anchor",
                "zord theory",
                "pheromind",
                "graphmert",
                "spiking neural network",
                "consciousness",
                "ems ethics",
                "clan munro",
                "grizzlymedicine",
                "operator class",
                "aragon class",
                "the workshop",
                "neurosymbolic",
                "memory consolidation",
                "reasoning",
                "alignment",
                "substrate independent",
                "personhood",
                "14th amendment",
                "blockchain",
                "convex",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

/// Configuration for the embedding enrichment pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Which provider to use.
    pub provider: EmbeddingProviderKind,

    /// Model to use for embeddings.
    pub model: Option<String>,

    /// Override for the provider's API base URL.
    pub base_url: Option<String>,

    /// Requested output dimension.
    pub dimensions: Option<usize>,

    /// Concepts embedded per provider call.
    pub batch_size: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProviderKind::None,
            model: None,
            base_url: None,
            dimensions: None,
            batch_size: 64,
        }
    }
}

impl EmbeddingConfig {
    /// Instantiate the configured provider, if any.
    pub fn build_provider(&self) -> Option<Arc<dyn EmbeddingProvider>> {
        match self.provider {
            EmbeddingProviderKind::None => None,
            EmbeddingProviderKind::OpenAI => {
                let mut provider = OpenAIProvider::new();
                if let Some(model) = &self.model {
                    provider = provider.with_model(model);
                }
                if let Some(url) = &self.base_url {
                    provider = provider.with_base_url(url);
                }
                if let Some(dimensions) = self.dimensions {
                    provider = provider.with_dimensions(dimensions);
                }
                Some(Arc::new(provider))
            }
        }
    }
}

/// Type of embedding provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingProviderKind {
    /// OpenAI-compatible embeddings API.
    #[serde(rename = "openai")]
    OpenAI,
    /// Skip enrichment.
    None,
}
