//! Embedding enrichment for concept nodes.

use kgraph_embeddings::{EmbeddingError, EmbeddingProvider, EmbeddingRequest};
use tracing::{debug, info};

use crate::error::Result;
use crate::node::{NodeStore, NodeType};

/// Attach an embedding to every concept node.
///
/// Concepts are embedded in batches of `batch_size`, in node insertion
/// order. Embeddings are only written back once every batch has succeeded,
/// so a failure leaves the store untouched. Returns the number of concepts
/// that received an embedding.
pub async fn enrich_concepts(
    nodes: &mut NodeStore,
    provider: &dyn EmbeddingProvider,
    batch_size: usize,
) -> Result<usize> {
    let concepts: Vec<(String, String)> = nodes
        .of_type(NodeType::Concept)
        .filter_map(|node| {
            node.as_concept()
                .map(|concept| (node.id.clone(), concept.embedding_text()))
        })
        .collect();

    if concepts.is_empty() {
        debug!("No concepts to embed");
        return Ok(0);
    }

    info!(
        "Embedding {} concepts with {} ({})",
        concepts.len(),
        provider.name(),
        provider.default_model()
    );

    let mut embeddings = Vec::with_capacity(concepts.len());
    for chunk in concepts.chunks(batch_size.max(1)) {
        let requests = chunk
            .iter()
            .map(|(_, text)| EmbeddingRequest::new(text.as_str()))
            .collect::<Vec<_>>();
        let responses = provider.embed_batch(requests).await?;
        if responses.len() != chunk.len() {
            return Err(EmbeddingError::InvalidResponse(format!(
                "expected {} embeddings, got {}",
                chunk.len(),
                responses.len()
            ))
            .into());
        }
        embeddings.extend(responses.into_iter().map(|response| response.embedding));
        debug!("Embedded {}/{} concepts", embeddings.len(), concepts.len());
    }

    let mut attached = 0;
    for ((id, _), embedding) in concepts.into_iter().zip(embeddings) {
        if let Some(node) = nodes.get_mut(&id) {
            node.embedding = Some(embedding);
            attached += 1;
        }
    }

    Ok(attached)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraphError;
    use crate::node::{ConceptData, DocumentData, DocumentKind, Node};
    use async_trait::async_trait;
    use kgraph_embeddings::EmbeddingResponse;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    /// Embeds each text as `[len]` and records batch sizes.
    #[derive(Default)]
    struct LengthEmbedder {
        batches: Mutex<Vec<usize>>,
        fail_on_batch: Option<usize>,
    }

    #[async_trait]
    impl EmbeddingProvider for LengthEmbedder {
        fn name(&self) -> &str {
            "length"
        }

        fn default_model(&self) -> &str {
            "length-v1"
        }

        async fn embed(
            &self,
            request: EmbeddingRequest,
        ) -> kgraph_embeddings::Result<EmbeddingResponse> {
            Ok(EmbeddingResponse {
                embedding: vec![request.text.len() as f32],
                model: "length-v1".to_string(),
                dimension: 1,
            })
        }

        async fn embed_batch(
            &self,
            requests: Vec<EmbeddingRequest>,
        ) -> kgraph_embeddings::Result<Vec<EmbeddingResponse>> {
            let batch = {
                let mut batches = self.batches.lock().unwrap();
                batches.push(requests.len());
                batches.len()
            };
            if self.fail_on_batch == Some(batch) {
                return Err(EmbeddingError::ApiRequest("boom".to_string()));
            }
            let mut out = Vec::new();
            for request in requests {
                out.push(self.embed(request).await?);
            }
            Ok(out)
        }

        fn is_available(&self) -> bool {
            true
        }
    }

    fn store() -> NodeStore {
        let mut nodes = NodeStore::new();
        nodes.add_node(Node::document(
            "/docs/a.md",
            DocumentData {
                title: "a".to_string(),
                source: DocumentKind::Notes,
                filepath: "/docs/a.md".to_string(),
                content_hash: "abc".to_string(),
                page_count: None,
                word_count: 3,
            },
        ));
        nodes.add_node(Node::concept(ConceptData::extracted("convex")));
        nodes.add_node(Node::concept(ConceptData::extracted("graphmert")));
        nodes.add_node(Node::concept(ConceptData {
            definition: Some("stigmergic swarm".to_string()),
            ..ConceptData::extracted("pheromind")
        }));
        nodes
    }

    #[tokio::test]
    async fn test_attaches_embeddings_to_concepts_only() {
        let mut nodes = store();
        let provider = LengthEmbedder::default();

        let attached = enrich_concepts(&mut nodes, &provider, 2).await.unwrap();
        assert_eq!(attached, 3);
        assert_eq!(*provider.batches.lock().unwrap(), vec![2, 1]);

        for node in nodes.of_type(NodeType::Concept) {
            assert!(node.embedding.is_some(), "{} has no embedding", node.id);
        }
        assert!(nodes.of_type(NodeType::Document).all(|n| n.embedding.is_none()));

        let pheromind = nodes
            .iter()
            .find(|n| n.as_concept().is_some_and(|c| c.name == "pheromind"))
            .unwrap();
        assert_eq!(pheromind.embedding, Some(vec!["pheromind stigmergic swarm".len() as f32]));
    }

    #[tokio::test]
    async fn test_failure_leaves_store_untouched() {
        let mut nodes = store();
        let provider = LengthEmbedder {
            fail_on_batch: Some(2),
            ..Default::default()
        };

        let err = enrich_concepts(&mut nodes, &provider, 2).await.unwrap_err();
        assert!(matches!(err, GraphError::Embedding(_)));
        assert!(nodes.iter().all(|n| n.embedding.is_none()));
    }

    #[tokio::test]
    async fn test_no_concepts_skips_provider() {
        let mut nodes = NodeStore::new();
        let provider = LengthEmbedder::default();

        assert_eq!(enrich_concepts(&mut nodes, &provider, 8).await.unwrap(), 0);
        assert!(provider.batches.lock().unwrap().is_empty());
    }
}
