//! JSON snapshot export.
//!
//! A snapshot is three files in the output directory:
//!
//! - `nodes.json`: object mapping node id to node record, in insertion order
//! - `relationships.json`: array of relationship records, in insertion order
//! - `stats.json`: [`GraphStats`]
//!
//! Each file is written to a temporary sibling and renamed into place.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, info};

use crate::error::{Result, SnapshotError};
use crate::graph::KnowledgeGraph;
use crate::node::NodeType;

pub const NODES_FILE: &str = "nodes.json";
pub const RELATIONSHIPS_FILE: &str = "relationships.json";
pub const STATS_FILE: &str = "stats.json";

/// Node count per node type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeTypeCounts {
    pub concept: usize,
    pub document: usize,
    pub anchor: usize,
}

/// Summary statistics of a graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphStats {
    pub total_nodes: usize,
    pub total_relationships: usize,
    pub node_types: NodeTypeCounts,
    pub relationship_types: BTreeMap<String, usize>,
    pub generated: DateTime<Utc>,
}

impl GraphStats {
    pub fn from_graph(graph: &KnowledgeGraph, generated: DateTime<Utc>) -> Self {
        let nodes = graph.nodes();
        Self {
            total_nodes: nodes.len(),
            total_relationships: graph.relationships().len(),
            node_types: NodeTypeCounts {
                concept: nodes.count_of_type(NodeType::Concept),
                document: nodes.count_of_type(NodeType::Document),
                anchor: nodes.count_of_type(NodeType::Anchor),
            },
            relationship_types: graph.relationships().count_by_type(),
            generated,
        }
    }
}

/// Locations of the written snapshot files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotPaths {
    pub nodes: PathBuf,
    pub relationships: PathBuf,
    pub stats: PathBuf,
}

/// Write `graph` to `output_dir`, creating the directory if needed.
pub async fn write_snapshot(graph: &KnowledgeGraph, output_dir: &Path) -> Result<SnapshotPaths> {
    fs::create_dir_all(output_dir)
        .await
        .map_err(|e| SnapshotError::CreateDirectory(format!("{}: {e}", output_dir.display())))?;

    let paths = SnapshotPaths {
        nodes: output_dir.join(NODES_FILE),
        relationships: output_dir.join(RELATIONSHIPS_FILE),
        stats: output_dir.join(STATS_FILE),
    };

    let stats = GraphStats::from_graph(graph, Utc::now());

    write_json(&paths.nodes, &serde_json::to_string_pretty(graph.nodes().as_map())?).await?;
    write_json(
        &paths.relationships,
        &serde_json::to_string_pretty(graph.relationships().as_slice())?,
    )
    .await?;
    write_json(&paths.stats, &serde_json::to_string_pretty(&stats)?).await?;

    info!(
        "Wrote snapshot to {} ({} nodes, {} relationships)",
        output_dir.display(),
        stats.total_nodes,
        stats.total_relationships
    );
    Ok(paths)
}

async fn write_json(path: &Path, content: &str) -> Result<()> {
    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, content)
        .await
        .map_err(|e| SnapshotError::WriteFile(format!("{}: {e}", temp_path.display())))?;

    fs::rename(&temp_path, path)
        .await
        .map_err(|e| SnapshotError::WriteFile(format!("{}: {e}", path.display())))?;

    debug!("Wrote {}", path.display());
    Ok(())
}
