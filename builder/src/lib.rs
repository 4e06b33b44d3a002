//! # Knowledge Graph Builder
//!
//! Turns a directory of research material (PDF, markdown, plain text) into an
//! attributed graph of documents, extracted concepts and a fixed set of anchor
//! entities, then writes it out as a JSON snapshot.
//!
//! - **Deterministic identity**: node ids are derived from `(type, name)` only
//! - **Merge on duplicate**: re-inserting a node merges its data by key
//! - **Reinforcement**: re-inserting an edge strengthens it instead of duplicating it
//! - **Content dedup**: byte-identical documents are ingested once per run
//! - **Co-occurrence**: concepts sharing documents get `related_to` edges
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Graph Pipeline                             │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  anchors ──► discovery ──► DocumentParser ──► content hash      │
//! │                                                   │             │
//! │                                                   ▼             │
//! │  ConceptExtractor ◄── document node ◄── NodeStore               │
//! │       │                                                         │
//! │       ▼                                                         │
//! │  concept nodes + extracted_from ──► RelationshipStore           │
//! │                                                                 │
//! │  co-occurrence ──► embedding enrichment ──► snapshot            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod anchor;
pub mod config;
pub mod cooccurrence;
pub mod discovery;
pub mod enrichment;
pub mod error;
pub mod extraction;
pub mod graph;
pub mod identity;
pub mod node;
pub mod parser;
pub mod pipeline;
pub mod relationship;
pub mod snapshot;

pub use anchor::{default_anchors, seed_anchors};
pub use config::{
    DiscoveryConfig, EmbeddingConfig, EmbeddingProviderKind, ExtractionConfig, GraphConfig,
};
pub use cooccurrence::infer_cooccurrence;
pub use discovery::discover_files;
pub use enrichment::enrich_concepts;
pub use error::{GraphError, ParseError, Result, SnapshotError};
pub use extraction::{ConceptExtractor, KeywordExtractor};
pub use graph::KnowledgeGraph;
pub use identity::generate_id;
pub use node::{
    AnchorData, ConceptData, DocumentData, DocumentKind, Node, NodeData, NodeStore, NodeType,
};
pub use parser::{DocumentParser, FileParser, ParsedDocument};
pub use pipeline::{BuildOutput, GraphPipeline, IngestOutcome, IngestSession, RunSummary};
pub use relationship::{Relationship, RelationshipStore, rel_types};
pub use snapshot::{GraphStats, NodeTypeCounts, SnapshotPaths, write_snapshot};

/// Current wall-clock time as floating epoch seconds.
pub(crate) fn now_timestamp() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}
