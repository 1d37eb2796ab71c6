//! Retrieval engine: the extract → chunk → embed → index build and the
//! embed → search → filter → dedupe query path.
//!
//! Build-time failures always escalate — a caller never receives a
//! document without a valid index. Query-time failures never escalate:
//! [`retrieve`](RetrievalEngine::retrieve) converts them into a
//! degenerate [`Retrieved`] result at its boundary, so the downstream
//! answering step always has something to work with.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::chunking::{Chunker, SentenceChunker};
use crate::config::RagConfig;
use crate::document::{Document, DocumentInfo, Passage, Retrieved};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::extract::{span_walk, PdfSource, TextExtractor};
use crate::index::FlatIndex;

/// Orchestrates document building and passage retrieval.
///
/// Construct one via [`RetrievalEngine::builder()`]. The engine itself
/// is immutable and cheap to share; concurrent retrievals against the
/// same [`Document`] need no locking because documents never change
/// after construction.
pub struct RetrievalEngine {
    config: RagConfig,
    provider: Arc<dyn EmbeddingProvider>,
    chunker: Arc<dyn Chunker>,
    extractor: TextExtractor,
}

impl RetrievalEngine {
    /// Create a new [`RetrievalEngineBuilder`].
    pub fn builder() -> RetrievalEngineBuilder {
        RetrievalEngineBuilder::default()
    }

    /// Return a reference to the engine configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Build a document from raw PDF bytes: extract, chunk, embed, index.
    ///
    /// # Errors
    ///
    /// - [`RagError::DocumentParse`] — the bytes are not a readable PDF.
    /// - [`RagError::EmptyDocument`] — no passage survived extraction,
    ///   chunking, and the span-walk fallback.
    /// - [`RagError::Embedding`] / [`RagError::Index`] — the embed or
    ///   index-build step failed.
    pub async fn build_document(&self, bytes: &[u8]) -> Result<Document> {
        let source = PdfSource::open(bytes)?;
        info!(pages = source.page_count(), "processing PDF");

        let pages = self.extractor.extract_pages(&source);
        let mut passages: Vec<Passage> = Vec::new();
        for page in &pages {
            passages.extend(self.chunker.chunk(&page.text, page.page));
        }

        if passages.is_empty() {
            debug!("no passages from chunking, trying span-walk fallback");
            passages = span_walk(&source);
        }

        self.index_passages(passages).await
    }

    /// Embed and index pre-extracted passages.
    ///
    /// This is the tail of [`build_document`](Self::build_document),
    /// exposed so callers with text from another source can still get
    /// an indexed document.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::EmptyDocument`] for an empty passage list;
    /// embedding and index-build failures propagate unchanged.
    pub async fn index_passages(&self, passages: Vec<Passage>) -> Result<Document> {
        if passages.is_empty() {
            return Err(RagError::EmptyDocument);
        }

        for (i, passage) in passages.iter().take(3).enumerate() {
            let preview: String = passage.text.chars().take(100).collect();
            debug!(sample = i + 1, %preview, "sample passage");
        }

        let texts: Vec<&str> = passages.iter().map(|p| p.text.as_str()).collect();
        let embeddings = self.provider.embed_batch(&texts).await?;
        let index = FlatIndex::build(&embeddings)?;

        info!(passage_count = passages.len(), "indexed document");
        Ok(Document::new(passages, index))
    }

    /// Retrieve the most relevant passages for a query, using the
    /// configured `top_k`.
    ///
    /// Never fails past this boundary: embedding or search errors
    /// degrade to a one-element [`Retrieved`] carrying an
    /// error-indicator string.
    pub async fn retrieve(&self, document: &Document, query: &str) -> Retrieved {
        self.retrieve_k(document, query, self.config.top_k).await
    }

    /// Retrieve at most `k` relevant passages for a query.
    pub async fn retrieve_k(&self, document: &Document, query: &str, k: usize) -> Retrieved {
        match self.try_retrieve(document, query, k).await {
            Ok(retrieved) => retrieved,
            Err(e) => {
                error!(error = %e, "retrieval failed, degrading to error sentinel");
                Retrieved::error()
            }
        }
    }

    async fn try_retrieve(&self, document: &Document, query: &str, k: usize) -> Result<Retrieved> {
        if document.is_empty() {
            return Ok(Retrieved::no_document());
        }

        let query_vector = self
            .provider
            .embed(query)
            .await
            .map_err(|e| RagError::Retrieval(format!("query embedding failed: {e}")))?;

        // Over-fetch so filtering and dedup still leave k survivors.
        let fetch = (k * self.config.overfetch_factor).min(document.len());
        let neighbors = document
            .index()
            .search(&query_vector, fetch)
            .map_err(|e| RagError::Retrieval(format!("index search failed: {e}")))?;

        let mut accepted: Vec<String> = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        for neighbor in &neighbors {
            let passage = &document.passages()[neighbor.index];
            if neighbor.distance < self.config.distance_threshold
                && seen.insert(passage.text.as_str())
            {
                accepted.push(passage.text.clone());
            }
            if accepted.len() >= k {
                break;
            }
        }

        info!(query, result_count = accepted.len(), "retrieval completed");

        if accepted.is_empty() {
            // No candidate cleared the threshold. Hand back the leading
            // passages so the answering step still gets some context.
            let count = self.config.fallback_passages.min(document.len());
            let leading: Vec<String> =
                document.passages()[..count].iter().map(|p| p.text.clone()).collect();
            return Ok(Retrieved::leading_fallback(leading));
        }

        Ok(Retrieved::ranked(accepted))
    }

    /// Read-only diagnostics for a document.
    pub fn document_info(&self, document: &Document) -> DocumentInfo {
        DocumentInfo {
            total_passages: document.len(),
            sample_passages: document
                .passages()
                .iter()
                .take(2)
                .map(|p| p.text.clone())
                .collect(),
        }
    }
}

/// Builder for constructing a [`RetrievalEngine`].
///
/// Only the embedding provider is required; the config defaults to
/// [`RagConfig::default()`] and the chunker to a [`SentenceChunker`]
/// derived from that config.
#[derive(Default)]
pub struct RetrievalEngineBuilder {
    config: Option<RagConfig>,
    provider: Option<Arc<dyn EmbeddingProvider>>,
    chunker: Option<Arc<dyn Chunker>>,
}

impl RetrievalEngineBuilder {
    /// Set the engine configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Override the chunker.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Build the [`RetrievalEngine`].
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if no embedding provider was set.
    pub fn build(self) -> Result<RetrievalEngine> {
        let provider = self
            .provider
            .ok_or_else(|| RagError::Config("embedding_provider is required".to_string()))?;
        let config = self.config.unwrap_or_default();
        let chunker = self.chunker.unwrap_or_else(|| {
            Arc::new(SentenceChunker::new(config.chunk_max_chars, config.min_passage_chars))
        });

        Ok(RetrievalEngine { config, provider, chunker, extractor: TextExtractor::default() })
    }
}
