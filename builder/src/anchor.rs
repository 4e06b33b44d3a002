//! Fixed anchor entities seeded at the start of every run.

use tracing::debug;

use crate::graph::KnowledgeGraph;
use crate::node::{AnchorData, Node};
use crate::relationship::{Relationship, rel_types};

/// Strength of the `supports` edges between anchors.
pub const ANCHOR_SUPPORT_STRENGTH: f64 = 0.9;

/// The three ethical/identity anchors.
pub fn default_anchors() -> Vec<AnchorData> {
    [
        (
            "ems_ethics",
            "Do NO harm, do KNOW harm",
            "EMS decision-making under uncertainty framework",
            0.34,
        ),
        (
            "clan_munro",
            "Dread God, Protect the Clan, Honor in deed",
            "Scottish Highland honor codes and Viking ethics",
            0.33,
        ),
        (
            "grizzlymedicine",
            "Solve yesterday's problems with tomorrow's technology today",
            "Innovation in service of human wellbeing",
            0.33,
        ),
    ]
    .into_iter()
    .map(|(anchor_type, principle, description, weight)| AnchorData {
        anchor_type: anchor_type.to_string(),
        principle: principle.to_string(),
        description: description.to_string(),
        weight,
        applied_count: 0,
    })
    .collect()
}

/// Insert anchor nodes and a `supports` edge for every distinct pair.
///
/// Pairs are emitted as `anchors[i] -> anchors[j]` for `i < j`, flagged
/// bidirectional. Returns the anchor node ids in input order.
pub fn seed_anchors(graph: &mut KnowledgeGraph, anchors: &[AnchorData]) -> Vec<String> {
    let ids: Vec<String> = anchors
        .iter()
        .map(|anchor| graph.add_node(Node::anchor(anchor.clone())).id.clone())
        .collect();

    for (i, from_id) in ids.iter().enumerate() {
        for to_id in &ids[i + 1..] {
            graph.add_relationship(
                Relationship::new(
                    from_id.as_str(),
                    to_id.as_str(),
                    rel_types::SUPPORTS,
                    ANCHOR_SUPPORT_STRENGTH,
                )
                .bidirectional(),
            );
        }
    }

    debug!("Seeded {} anchor nodes", ids.len());
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::generate_id;
    use crate::node::NodeType;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_seed_is_triangular() {
        let mut graph = KnowledgeGraph::new();
        let ids = seed_anchors(&mut graph, &default_anchors());

        assert_eq!(ids.len(), 3);
        assert_eq!(graph.nodes().count_of_type(NodeType::Anchor), 3);
        assert_eq!(graph.relationships().of_type(rel_types::SUPPORTS).count(), 3);
        assert!(graph.relationships().iter().all(|r| r.bidirectional && r.strength == 0.9));

        assert!(graph.relationships().find(&ids[0], &ids[1], rel_types::SUPPORTS).is_some());
        assert!(graph.relationships().find(&ids[0], &ids[2], rel_types::SUPPORTS).is_some());
        assert!(graph.relationships().find(&ids[1], &ids[2], rel_types::SUPPORTS).is_some());
    }

    #[test]
    fn test_anchor_ids_follow_anchor_type() {
        let mut graph = KnowledgeGraph::new();
        let ids = seed_anchors(&mut graph, &default_anchors());
        assert_eq!(ids[0], generate_id("anchor", "ems_ethics"));
    }

    #[test]
    fn test_reseeding_reinforces() {
        let mut graph = KnowledgeGraph::new();
        seed_anchors(&mut graph, &default_anchors());
        seed_anchors(&mut graph, &default_anchors());

        assert_eq!(graph.nodes().len(), 3);
        assert_eq!(graph.relationships().len(), 3);
        assert!(graph.relationships().iter().all(|r| r.reinforcement_count == 2));
    }
}
