//! Graph nodes and the merge-on-conflict node store.
//!
//! Node payloads are typed per node kind ([`NodeData`]). Merging follows
//! "last writer wins per key": every attribute the incoming record carries
//! overwrites the stored one, optional attributes the incoming record omits
//! are left alone.

use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::identity::generate_id;
use crate::now_timestamp;

/// Kind of node in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    /// A parsed source document.
    Document,
    /// A topic or term extracted from documents.
    Concept,
    /// A fixed ethical/identity seed entity.
    Anchor,
}

impl NodeType {
    /// Get a string representation, also used as the id-hash prefix.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Concept => "concept",
            Self::Anchor => "anchor",
        }
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Document subtype, classified from the file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Whitepaper,
    Specification,
    ResearchPaper,
    Notes,
}

/// Attributes of a document node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentData {
    pub title: String,

    /// Document subtype.
    pub source: DocumentKind,

    /// Path the document was read from.
    pub filepath: String,

    /// SHA-256 of the extracted text.
    pub content_hash: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,

    pub word_count: usize,
}

impl DocumentData {
    fn merge(&mut self, incoming: DocumentData) {
        self.title = incoming.title;
        self.source = incoming.source;
        self.filepath = incoming.filepath;
        self.content_hash = incoming.content_hash;
        if incoming.page_count.is_some() {
            self.page_count = incoming.page_count;
        }
        self.word_count = incoming.word_count;
    }
}

/// Attributes of a concept node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptData {
    pub name: String,
    pub category: String,
    pub confidence: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
}

impl ConceptData {
    /// Concept as produced by document extraction.
    pub fn extracted(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: "theory".to_string(),
            confidence: 0.8,
            definition: None,
        }
    }

    /// Text handed to the embedding provider: `"{name} {definition}"`, with
    /// an empty definition when none is set.
    pub fn embedding_text(&self) -> String {
        format!("{} {}", self.name, self.definition.as_deref().unwrap_or_default())
    }

    fn merge(&mut self, incoming: ConceptData) {
        self.name = incoming.name;
        self.category = incoming.category;
        self.confidence = incoming.confidence;
        if incoming.definition.is_some() {
            self.definition = incoming.definition;
        }
    }
}

/// Attributes of an anchor node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchorData {
    pub anchor_type: String,
    pub principle: String,
    pub description: String,
    pub weight: f64,
    pub applied_count: u32,
}

/// Typed node payload.
///
/// Serialized untagged: the node's `type` field carries the kind, and the
/// three records have disjoint required keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeData {
    Document(DocumentData),
    Concept(ConceptData),
    Anchor(AnchorData),
}

impl NodeData {
    /// Node kind implied by this payload.
    pub fn node_type(&self) -> NodeType {
        match self {
            Self::Document(_) => NodeType::Document,
            Self::Concept(_) => NodeType::Concept,
            Self::Anchor(_) => NodeType::Anchor,
        }
    }

    fn merge(&mut self, incoming: NodeData) {
        match (self, incoming) {
            (Self::Document(current), Self::Document(incoming)) => current.merge(incoming),
            (Self::Concept(current), Self::Concept(incoming)) => current.merge(incoming),
            // Anchor records carry no optional keys.
            (Self::Anchor(current), Self::Anchor(incoming)) => *current = incoming,
            (current, incoming) => {
                warn!(
                    "Replacing {} payload with {} payload on id collision",
                    current.node_type(),
                    incoming.node_type()
                );
                *current = incoming;
            }
        }
    }
}

/// A typed entity in the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,

    #[serde(rename = "type")]
    pub node_type: NodeType,

    pub data: NodeData,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,

    /// Epoch seconds.
    pub created: f64,

    /// Epoch seconds.
    pub last_accessed: f64,

    pub access_count: u64,
}

impl Node {
    /// Create a node with the given id; the type follows the payload.
    pub fn new(id: impl Into<String>, data: NodeData) -> Self {
        let now = now_timestamp();
        Self {
            id: id.into(),
            node_type: data.node_type(),
            data,
            embedding: None,
            created: now,
            last_accessed: now,
            access_count: 0,
        }
    }

    /// Document node keyed by its source path.
    pub fn document(path: &str, data: DocumentData) -> Self {
        Self::new(
            generate_id(NodeType::Document.as_str(), path),
            NodeData::Document(data),
        )
    }

    /// Concept node keyed by its label.
    pub fn concept(data: ConceptData) -> Self {
        let id = generate_id(NodeType::Concept.as_str(), &data.name);
        Self::new(id, NodeData::Concept(data))
    }

    /// Anchor node keyed by its anchor type.
    pub fn anchor(data: AnchorData) -> Self {
        let id = generate_id(NodeType::Anchor.as_str(), &data.anchor_type);
        Self::new(id, NodeData::Anchor(data))
    }

    /// Concept payload, if this is a concept node.
    pub fn as_concept(&self) -> Option<&ConceptData> {
        match &self.data {
            NodeData::Concept(concept) => Some(concept),
            _ => None,
        }
    }

    /// Document payload, if this is a document node.
    pub fn as_document(&self) -> Option<&DocumentData> {
        match &self.data {
            NodeData::Document(document) => Some(document),
            _ => None,
        }
    }

    /// Fold a re-inserted node into this one.
    ///
    /// `created` and `embedding` are kept as-is.
    fn merge(&mut self, incoming: Node) {
        self.access_count += 1;
        self.last_accessed = now_timestamp();
        self.data.merge(incoming.data);
        self.node_type = self.data.node_type();
    }
}

/// Nodes keyed by id, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct NodeStore {
    nodes: IndexMap<String, Node>,
}

impl NodeStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, merging into the stored node when the id exists.
    ///
    /// Returns the effective stored node.
    pub fn add_node(&mut self, node: Node) -> &Node {
        match self.nodes.entry(node.id.clone()) {
            Entry::Occupied(entry) => {
                let existing = entry.into_mut();
                existing.merge(node);
                existing
            }
            Entry::Vacant(entry) => entry.insert(node),
        }
    }

    /// Get a node by id.
    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Get a mutable node by id.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Check whether a node exists.
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Iterate nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Iterate nodes of one kind in insertion order.
    pub fn of_type(&self, node_type: NodeType) -> impl Iterator<Item = &Node> {
        self.nodes.values().filter(move |n| n.node_type == node_type)
    }

    /// Count nodes of one kind.
    pub fn count_of_type(&self, node_type: NodeType) -> usize {
        self.of_type(node_type).count()
    }

    /// Number of stored nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Id-keyed view, used by the snapshot writer.
    pub fn as_map(&self) -> &IndexMap<String, Node> {
        &self.nodes
    }
}
