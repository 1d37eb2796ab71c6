//! Embedding provider trait for mapping text to dense vectors.

use async_trait::async_trait;

use crate::error::Result;

/// A provider that maps text to fixed-dimension dense vectors.
///
/// Implementations wrap a concrete embedding backend (a local ONNX
/// model, an HTTP embeddings endpoint, a test stub) behind a unified
/// async interface. Outputs must be deterministic for a given model
/// version, and every vector from one provider instance has
/// [`dimensions()`](EmbeddingProvider::dimensions) components — the
/// retrieval engine relies on that to keep query and passage vectors
/// comparable.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed a batch of texts, one vector per input, in input order.
    ///
    /// The default implementation embeds sequentially. Backends with
    /// native batching should override it.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed(text).await?);
        }
        Ok(vectors)
    }

    /// Dimensionality of the produced vectors.
    fn dimensions(&self) -> usize;
}
