//! Data types for passages, documents, and retrieval results.

use serde::{Deserialize, Serialize};

use crate::index::FlatIndex;

/// A retrievable unit of document text with page provenance.
///
/// Passages are immutable once created. The chunker guarantees a
/// minimum text length except for the single-passage short-document
/// fallback case.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Passage {
    /// The passage text, prefixed with its page marker.
    pub text: String,
    /// The 1-indexed source page number.
    pub page: u32,
}

impl Passage {
    /// Create a new passage.
    pub fn new(text: impl Into<String>, page: u32) -> Self {
        Self { text: text.into(), page }
    }

    /// Length of the passage text in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether the passage text is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// One indexed PDF: its passages and the flat search index over their
/// embeddings.
///
/// A document is built once and never mutated. Replacing the uploaded
/// PDF means building a new `Document` and swapping the reference (see
/// [`DocumentSession`](crate::DocumentSession)); the index never sees
/// incremental inserts or deletes.
#[derive(Debug)]
pub struct Document {
    passages: Vec<Passage>,
    index: FlatIndex,
}

impl Document {
    /// Assemble a document from its passages and built index.
    ///
    /// Invariant (enforced by the engine): `index.len() == passages.len()`.
    pub(crate) fn new(passages: Vec<Passage>, index: FlatIndex) -> Self {
        debug_assert_eq!(passages.len(), index.len());
        Self { passages, index }
    }

    /// The passages in original page/sentence order.
    pub fn passages(&self) -> &[Passage] {
        &self.passages
    }

    /// The search index over the passage embeddings.
    pub(crate) fn index(&self) -> &FlatIndex {
        &self.index
    }

    /// Number of passages (equal to the number of indexed vectors).
    pub fn len(&self) -> usize {
        self.passages.len()
    }

    /// Whether the document holds no passages.
    ///
    /// Never true for a document produced by the engine, which rejects
    /// empty input before the index build.
    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }
}

/// Read-only diagnostics view of a [`Document`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentInfo {
    /// Total number of indexed passages.
    pub total_passages: usize,
    /// The first few passages, for eyeballing extraction quality.
    pub sample_passages: Vec<String>,
}

/// How a retrieval result was produced.
///
/// Degenerate outcomes are encoded here instead of being thrown past
/// the retrieval boundary, so callers can distinguish ranked matches
/// from fallback content without parsing strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalSource {
    /// Passages accepted by distance-threshold filtering and dedup.
    Ranked,
    /// No candidate survived filtering; the leading passages of the
    /// document were returned instead.
    LeadingFallback,
    /// The document has no passages; the single sentinel string.
    NoDocument,
    /// Embedding or search failed; the single error-indicator string.
    Error,
}

/// The ordered outcome of one retrieve call.
///
/// Ephemeral: has no identity beyond the call that produced it. The
/// passage list is never empty — every degenerate branch carries at
/// least one string for the downstream answering step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Retrieved {
    /// Passage texts in relevance order (or original order for the
    /// fallback branch).
    pub passages: Vec<String>,
    /// Which branch produced the passages.
    pub source: RetrievalSource,
}

impl Retrieved {
    pub(crate) fn ranked(passages: Vec<String>) -> Self {
        Self { passages, source: RetrievalSource::Ranked }
    }

    pub(crate) fn leading_fallback(passages: Vec<String>) -> Self {
        Self { passages, source: RetrievalSource::LeadingFallback }
    }

    /// The sentinel result for a session with no document loaded.
    pub fn no_document() -> Self {
        Self {
            passages: vec!["No documents available for retrieval.".to_string()],
            source: RetrievalSource::NoDocument,
        }
    }

    pub(crate) fn error() -> Self {
        Self {
            passages: vec!["Error retrieving information from the document.".to_string()],
            source: RetrievalSource::Error,
        }
    }

    /// Whether the passages are real document content rather than a
    /// sentinel message.
    pub fn has_context(&self) -> bool {
        matches!(self.source, RetrievalSource::Ranked | RetrievalSource::LeadingFallback)
    }
}
