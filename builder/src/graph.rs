//! The run-scoped graph: one node store plus one relationship store.

use crate::node::{Node, NodeStore};
use crate::relationship::{Relationship, RelationshipStore};

/// Nodes and relationships built during a single run.
///
/// Owned by the pipeline invocation that creates it; nothing else holds
/// references into the stores.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeGraph {
    nodes: NodeStore,
    relationships: RelationshipStore,
}

impl KnowledgeGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or merge a node.
    pub fn add_node(&mut self, node: Node) -> &Node {
        self.nodes.add_node(node)
    }

    /// Insert or reinforce a relationship.
    pub fn add_relationship(&mut self, rel: Relationship) -> &Relationship {
        self.relationships.add_relationship(rel)
    }

    pub fn nodes(&self) -> &NodeStore {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut NodeStore {
        &mut self.nodes
    }

    pub fn relationships(&self) -> &RelationshipStore {
        &self.relationships
    }
}
