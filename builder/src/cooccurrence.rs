//! Concept co-occurrence inference.
//!
//! Two concepts extracted from the same document are related; the more
//! documents they share, the stronger the edge. Every pair of concepts is
//! compared, so the pass is quadratic in concept count.

use std::collections::{HashMap, HashSet};

use tracing::info;

use crate::graph::KnowledgeGraph;
use crate::node::NodeType;
use crate::relationship::{MAX_STRENGTH, Relationship, rel_types};

/// Shared-document count at which a `related_to` edge saturates.
pub const SATURATION_OVERLAP: f64 = 3.0;

/// Strength of a `related_to` edge for a given document overlap.
pub fn overlap_strength(overlap: usize) -> f64 {
    (overlap as f64 / SATURATION_OVERLAP).min(MAX_STRENGTH)
}

/// Emit `related_to` edges between concepts sharing documents.
///
/// For concepts `c1` before `c2` in node insertion order, the edge runs
/// `c1 -> c2` and is flagged bidirectional. Returns the number of pairs that
/// produced an edge.
pub fn infer_cooccurrence(graph: &mut KnowledgeGraph) -> usize {
    let concepts: Vec<String> = graph
        .nodes()
        .of_type(NodeType::Concept)
        .map(|node| node.id.clone())
        .collect();

    let mut documents: HashMap<&str, HashSet<&str>> = HashMap::new();
    for rel in graph.relationships().of_type(rel_types::EXTRACTED_FROM) {
        documents
            .entry(rel.from_id.as_str())
            .or_default()
            .insert(rel.to_id.as_str());
    }

    let empty = HashSet::new();
    let mut related = Vec::new();
    for (i, c1) in concepts.iter().enumerate() {
        let docs1 = documents.get(c1.as_str()).unwrap_or(&empty);
        if docs1.is_empty() {
            continue;
        }
        for c2 in &concepts[i + 1..] {
            let docs2 = documents.get(c2.as_str()).unwrap_or(&empty);
            let overlap = docs1.intersection(docs2).count();
            if overlap > 0 {
                related.push(
                    Relationship::new(
                        c1.as_str(),
                        c2.as_str(),
                        rel_types::RELATED_TO,
                        overlap_strength(overlap),
                    )
                    .bidirectional(),
                );
            }
        }
    }

    let emitted = related.len();
    for rel in related {
        graph.add_relationship(rel);
    }

    info!(
        "Inferred {emitted} concept relationships from {} concepts",
        concepts.len()
    );
    emitted
}
