//! Error types for the `askpdf-rag` crate.

use thiserror::Error;

/// Errors that can occur while building or querying a document index.
#[derive(Debug, Error)]
pub enum RagError {
    /// The PDF could not be opened or read at all.
    ///
    /// Fatal to [`build_document`](crate::RetrievalEngine::build_document):
    /// no document is created.
    #[error("Document parse error: {0}")]
    DocumentParse(String),

    /// Parsing succeeded but no usable passage survived extraction,
    /// chunking, and the span-walk fallback.
    #[error("Document contains no extractable text")]
    EmptyDocument,

    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred building or searching the vector index.
    #[error("Index error: {0}")]
    Index(String),

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A failure during query-time retrieval.
    ///
    /// Internal: [`retrieve`](crate::RetrievalEngine::retrieve) catches
    /// this variant at its boundary and degrades to a sentinel result.
    #[error("Retrieval error: {0}")]
    Retrieval(String),
}

/// A convenience result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RagError>;
