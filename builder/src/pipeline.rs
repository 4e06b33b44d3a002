//! Graph build pipeline orchestration.
//!
//! A run seeds the anchors, streams every discovered file through
//! [`GraphPipeline::ingest_file`], then runs the co-occurrence and embedding
//! passes over the complete node set before the snapshot is written.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use kgraph_embeddings::EmbeddingProvider;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::anchor::{default_anchors, seed_anchors};
use crate::config::GraphConfig;
use crate::cooccurrence::infer_cooccurrence;
use crate::discovery::discover_files;
use crate::enrichment::enrich_concepts;
use crate::error::Result;
use crate::extraction::{ConceptExtractor, KeywordExtractor};
use crate::graph::KnowledgeGraph;
use crate::identity::content_hash;
use crate::node::{ConceptData, DocumentData, DocumentKind, Node};
use crate::parser::{DocumentParser, FileParser, ParsedDocument};
use crate::relationship::{Relationship, rel_types};
use crate::snapshot::write_snapshot;

/// Strength of a fresh `extracted_from` edge.
pub const EXTRACTION_STRENGTH: f64 = 0.9;

/// Extracted text length above which a PDF counts as a research paper.
pub const RESEARCH_PAPER_MIN_CHARS: usize = 5000;

/// A progress line is logged every this many files.
const PROGRESS_INTERVAL: usize = 10;

/// Counters for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub files_discovered: usize,
    pub documents_processed: usize,
    pub skipped_parse_errors: usize,
    pub skipped_duplicates: usize,
    pub embeddings_attached: usize,
    pub node_count: usize,
    pub relationship_count: usize,
}

impl RunSummary {
    /// Files that produced no document node.
    pub fn skipped(&self) -> usize {
        self.skipped_parse_errors + self.skipped_duplicates
    }
}

/// What happened to one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// A document node was created along with its concepts.
    Ingested { document_id: String, concepts: usize },
    /// The parser rejected the file.
    SkippedParse,
    /// The text was already ingested from another file this run.
    SkippedDuplicate,
}

/// Mutable state threaded through ingestion.
#[derive(Debug, Default)]
pub struct IngestSession {
    pub graph: KnowledgeGraph,
    content_hashes: HashSet<String>,
    pub summary: RunSummary,
}

impl IngestSession {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A built graph plus the counters of the run that built it.
#[derive(Debug)]
pub struct BuildOutput {
    pub graph: KnowledgeGraph,
    pub summary: RunSummary,
}

/// Builds a knowledge graph from a directory of documents.
pub struct GraphPipeline {
    config: GraphConfig,
    parser: Box<dyn DocumentParser>,
    extractor: Box<dyn ConceptExtractor>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
}

impl GraphPipeline {
    /// Create a pipeline with the collaborators described by `config`.
    pub fn new(config: GraphConfig) -> Self {
        Self {
            parser: Box::new(FileParser::new(config.discovery.max_file_size)),
            extractor: Box::new(KeywordExtractor::from_config(&config.extraction)),
            embedder: config.embedding.build_provider(),
            config,
        }
    }

    pub fn with_parser(mut self, parser: impl DocumentParser + 'static) -> Self {
        self.parser = Box::new(parser);
        self
    }

    pub fn with_extractor(mut self, extractor: impl ConceptExtractor + 'static) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    pub fn with_embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Ingest one file into the session.
    ///
    /// Parse failures and duplicate content are counted and skipped. An
    /// extractor failure still yields the document node, with no concepts.
    pub fn ingest_file(&self, session: &mut IngestSession, path: &Path) -> IngestOutcome {
        let parsed = match self.parser.parse(path) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Failed to parse {}: {e}", path.display());
                session.summary.skipped_parse_errors += 1;
                return IngestOutcome::SkippedParse;
            }
        };

        let hash = content_hash(&parsed.text);
        if !session.content_hashes.insert(hash.clone()) {
            warn!("Skipping duplicate content: {}", path.display());
            session.summary.skipped_duplicates += 1;
            return IngestOutcome::SkippedDuplicate;
        }

        let filepath = path.to_string_lossy().to_string();
        let data = DocumentData {
            title: parsed.title.clone(),
            source: classify_document(path, &parsed),
            filepath: filepath.clone(),
            content_hash: hash,
            page_count: parsed.page_count,
            word_count: parsed.text.split_whitespace().count(),
        };
        let document_id = session
            .graph
            .add_node(Node::document(&filepath, data))
            .id
            .clone();

        let labels = match self.extractor.extract(&parsed.text, &parsed.title) {
            Ok(labels) => labels,
            Err(e) => {
                warn!("Concept extraction failed for {}: {e}", path.display());
                Vec::new()
            }
        };

        for label in &labels {
            let concept_id = session
                .graph
                .add_node(Node::concept(ConceptData::extracted(label.as_str())))
                .id
                .clone();
            session.graph.add_relationship(Relationship::new(
                concept_id,
                document_id.as_str(),
                rel_types::EXTRACTED_FROM,
                EXTRACTION_STRENGTH,
            ));
        }

        debug!(
            "Ingested {} as {document_id} with {} concepts",
            path.display(),
            labels.len()
        );
        session.summary.documents_processed += 1;
        IngestOutcome::Ingested {
            document_id,
            concepts: labels.len(),
        }
    }

    /// Build a graph from every document under `input_dir`.
    pub async fn build(&self, input_dir: &Path) -> Result<BuildOutput> {
        let start_time = Instant::now();
        let mut session = IngestSession::new();

        let anchors = seed_anchors(&mut session.graph, &default_anchors());
        info!("Seeded {} anchor nodes", anchors.len());

        let files = discover_files(input_dir, &self.config.discovery)?;
        session.summary.files_discovered = files.len();

        for (i, path) in files.iter().enumerate() {
            if i % PROGRESS_INTERVAL == 0 {
                info!("Processing {i}/{}", files.len());
            }
            self.ingest_file(&mut session, path);
        }
        info!(
            "Processed {} documents, skipped {}",
            session.summary.documents_processed,
            session.summary.skipped()
        );

        infer_cooccurrence(&mut session.graph);

        match &self.embedder {
            Some(embedder) if embedder.is_available() => {
                match enrich_concepts(
                    session.graph.nodes_mut(),
                    embedder.as_ref(),
                    self.config.embedding.batch_size,
                )
                .await
                {
                    Ok(attached) => {
                        info!("Attached {attached} concept embeddings");
                        session.summary.embeddings_attached = attached;
                    }
                    Err(e) => warn!("Embedding enrichment skipped: {e}"),
                }
            }
            Some(embedder) => info!(
                "Embedding provider {} unavailable, skipping enrichment",
                embedder.name()
            ),
            None => debug!("No embedding provider configured"),
        }

        session.summary.node_count = session.graph.nodes().len();
        session.summary.relationship_count = session.graph.relationships().len();

        info!(
            "Graph built: {} nodes, {} relationships in {}ms",
            session.summary.node_count,
            session.summary.relationship_count,
            start_time.elapsed().as_millis()
        );

        Ok(BuildOutput {
            graph: session.graph,
            summary: session.summary,
        })
    }

    /// Build a graph and write its snapshot to `output_dir`.
    pub async fn run(&self, input_dir: &Path, output_dir: &Path) -> Result<RunSummary> {
        let BuildOutput { graph, summary } = self.build(input_dir).await?;
        write_snapshot(&graph, output_dir).await?;
        Ok(summary)
    }
}

/// Classify a document from its file name, falling back to length for PDFs.
pub fn classify_document(path: &Path, parsed: &ParsedDocument) -> DocumentKind {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if name.contains("whitepaper") || name.contains("white paper") {
        DocumentKind::Whitepaper
    } else if name.contains("spec") {
        DocumentKind::Specification
    } else if path.extension().is_some_and(|ext| ext == "pdf")
        && parsed.text.chars().count() > RESEARCH_PAPER_MIN_CHARS
    {
        DocumentKind::ResearchPaper
    } else {
        DocumentKind::Notes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parsed(text: &str) -> ParsedDocument {
        ParsedDocument {
            title: "t".to_string(),
            text: text.to_string(),
            page_count: None,
        }
    }

    #[test]
    fn test_classify_by_name() {
        let short = parsed("short");
        assert_eq!(
            classify_document(Path::new("/d/Convex_Whitepaper.pdf"), &short),
            DocumentKind::Whitepaper
        );
        assert_eq!(
            classify_document(Path::new("/d/the white paper.md"), &short),
            DocumentKind::Whitepaper
        );
        assert_eq!(
            classify_document(Path::new("/d/API-Spec.md"), &short),
            DocumentKind::Specification
        );
        assert_eq!(
            classify_document(Path::new("/d/journal.txt"), &short),
            DocumentKind::Notes
        );
    }

    #[test]
    fn test_classify_long_pdf_as_research_paper() {
        let long = parsed(&"x".repeat(RESEARCH_PAPER_MIN_CHARS + 1));
        assert_eq!(
            classify_document(Path::new("/d/paper.pdf"), &long),
            DocumentKind::ResearchPaper
        );
        assert_eq!(
            classify_document(Path::new("/d/paper.md"), &long),
            DocumentKind::Notes
        );
        let exact = parsed(&"x".repeat(RESEARCH_PAPER_MIN_CHARS));
        assert_eq!(
            classify_document(Path::new("/d/paper.pdf"), &exact),
            DocumentKind::Notes
        );
    }

    #[test]
    fn test_summary_skipped() {
        let summary = RunSummary {
            skipped_parse_errors: 2,
            skipped_duplicates: 1,
            ..Default::default()
        };
        assert_eq!(summary.skipped(), 3);
    }
}
