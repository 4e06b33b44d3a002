//! # Embeddings
//!
//! Vector-embedding providers used to enrich concept nodes in the
//! knowledge graph.
//!
//! Enrichment is optional: a provider reports whether it is usable through
//! [`EmbeddingProvider::is_available`], and callers are expected to treat
//! any [`EmbeddingError`] as recoverable.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Embeddings                                   │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  EmbeddingRequest ──► EmbeddingProvider ──► EmbeddingResponse   │
//! │                            │                                    │
//! │                            ▼                                    │
//! │                   OpenAI-compatible API                         │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod provider;

pub use error::{EmbeddingError, Result};
pub use provider::{EmbeddingProvider, EmbeddingRequest, EmbeddingResponse, OpenAIProvider};

/// A dense vector embedding.
pub type Embedding = Vec<f32>;
