//! Error types for the knowledge graph builder.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors that can occur while building or exporting a graph.
///
/// Only [`GraphError::InputNotFound`], configuration errors and
/// [`GraphError::Snapshot`] ever abort a run; everything else is recovered
/// inside the pipeline and surfaces as a log line plus a skip counter.
#[derive(Error, Debug)]
pub enum GraphError {
    /// Input directory does not exist or is not a directory.
    #[error("input directory not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// Concept extraction failed.
    #[error("extraction error: {0}")]
    Extraction(String),

    /// Embedding generation failed.
    #[error("embedding error: {0}")]
    Embedding(#[from] kgraph_embeddings::EmbeddingError),

    /// Snapshot could not be written.
    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    /// Configuration file could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    /// Configuration value is invalid.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Document parsing errors.
#[derive(Error, Debug)]
pub enum ParseError {
    /// No parser handles this file extension.
    #[error("unsupported file type: {}", .0.display())]
    Unsupported(PathBuf),

    /// File exceeds the configured size limit.
    #[error("file too large: {size} bytes (max {max})")]
    TooLarge { size: u64, max: u64 },

    /// File is not valid UTF-8 text.
    #[error("not valid UTF-8: {}", .0.display())]
    NotUtf8(PathBuf),

    /// PDF text extraction failed.
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    /// PDF support was not compiled in.
    #[error("PDF support not enabled, compile with --features pdf")]
    PdfFeatureNotEnabled,

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Snapshot-specific errors.
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// Failed to create the output directory.
    #[error("failed to create directory: {0}")]
    CreateDirectory(String),

    /// Failed to write a snapshot artifact.
    #[error("failed to write file: {0}")]
    WriteFile(String),
}
