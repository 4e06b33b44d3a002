//! `kgraph`: build a knowledge graph snapshot from a directory of documents.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use kgraph_builder::{EmbeddingProviderKind, GraphConfig, GraphPipeline};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Used when neither the command line nor the config names an input.
const DEFAULT_INPUT_DIR: &str = "research_materials";

#[derive(Debug, Parser)]
#[command(name = "kgraph", version, about = "Build a knowledge graph from research material")]
struct Cli {
    /// Directory scanned for PDF, markdown and text files.
    input_dir: Option<PathBuf>,

    /// Where nodes.json, relationships.json and stats.json are written.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Embedding provider for concept enrichment.
    #[arg(long, value_enum)]
    embeddings: Option<EmbeddingsArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EmbeddingsArg {
    Openai,
    None,
}

impl From<EmbeddingsArg> for EmbeddingProviderKind {
    fn from(arg: EmbeddingsArg) -> Self {
        match arg {
            EmbeddingsArg::Openai => EmbeddingProviderKind::OpenAI,
            EmbeddingsArg::None => EmbeddingProviderKind::None,
        }
    }
}

impl Cli {
    /// Load the config file (if any) and apply command-line overrides.
    fn resolve_config(&self) -> Result<GraphConfig> {
        let mut config = match &self.config {
            Some(path) => GraphConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => GraphConfig::default(),
        };

        if let Some(input) = &self.input_dir {
            config.input_dir = Some(input.clone());
        }
        if let Some(output) = &self.output {
            config.output_dir = Some(output.clone());
        }
        if let Some(embeddings) = self.embeddings {
            config.embedding.provider = embeddings.into();
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    let input_dir = config
        .input_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_DIR));
    let output_dir = config.resolve_output_dir(&input_dir);

    info!("Input: {}", input_dir.display());
    info!("Output: {}", output_dir.display());

    let summary = GraphPipeline::new(config)
        .run(&input_dir, &output_dir)
        .await
        .with_context(|| format!("failed to build graph from {}", input_dir.display()))?;

    info!(
        "Done: {} documents processed, {} skipped ({} parse errors, {} duplicates)",
        summary.documents_processed,
        summary.skipped(),
        summary.skipped_parse_errors,
        summary.skipped_duplicates
    );
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
