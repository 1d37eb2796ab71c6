//! Local embedding provider backed by fastembed.
//!
//! Runs all-MiniLM-L6-v2 (384 dimensions, L2-normalized output) in
//! process via ONNX. Model loading and inference are CPU-bound and go
//! through `spawn_blocking` so they never stall the async runtime.

use std::sync::Arc;

use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tracing::{debug, info};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

/// Output dimension of all-MiniLM-L6-v2.
const MINILM_DIMENSIONS: usize = 384;

/// An [`EmbeddingProvider`] running all-MiniLM-L6-v2 locally.
///
/// The model weights are fetched on first load and cached by fastembed.
/// The loaded model is shared via `Arc`, so cloning the provider is
/// cheap and all clones reuse the same weights.
///
/// # Example
///
/// ```rust,ignore
/// use askpdf_rag::LocalEmbeddingProvider;
///
/// let provider = LocalEmbeddingProvider::load().await?;
/// let vector = provider.embed("hello world").await?;
/// assert_eq!(vector.len(), 384);
/// ```
#[derive(Clone)]
pub struct LocalEmbeddingProvider {
    model: Arc<TextEmbedding>,
}

impl LocalEmbeddingProvider {
    /// Load the model, downloading weights on first use.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Embedding`] if the model cannot be fetched
    /// or initialized.
    pub async fn load() -> Result<Self> {
        info!(model = "all-MiniLM-L6-v2", "loading local embedding model");
        let model = tokio::task::spawn_blocking(|| {
            TextEmbedding::try_new(
                InitOptions::new(EmbeddingModel::AllMiniLML6V2).with_show_download_progress(false),
            )
        })
        .await
        .map_err(|e| RagError::Embedding {
            provider: "fastembed".into(),
            message: format!("model load task failed: {e}"),
        })?
        .map_err(|e| RagError::Embedding {
            provider: "fastembed".into(),
            message: format!("model initialization failed: {e}"),
        })?;

        Ok(Self { model: Arc::new(model) })
    }

    async fn run_embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        debug!(batch_size = texts.len(), "embedding batch locally");
        let model = Arc::clone(&self.model);
        tokio::task::spawn_blocking(move || model.embed(texts, None))
            .await
            .map_err(|e| RagError::Embedding {
                provider: "fastembed".into(),
                message: format!("embedding task failed: {e}"),
            })?
            .map_err(|e| RagError::Embedding {
                provider: "fastembed".into(),
                message: format!("embedding generation failed: {e}"),
            })
    }
}

#[async_trait]
impl EmbeddingProvider for LocalEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.run_embed(vec![text.to_string()]).await?;
        vectors.pop().ok_or_else(|| RagError::Embedding {
            provider: "fastembed".into(),
            message: "model returned no vector".into(),
        })
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let owned: Vec<String> = texts.iter().map(|t| t.to_string()).collect();
        let vectors = self.run_embed(owned).await?;
        if vectors.len() != texts.len() {
            return Err(RagError::Embedding {
                provider: "fastembed".into(),
                message: format!("expected {} vectors, got {}", texts.len(), vectors.len()),
            });
        }
        Ok(vectors)
    }

    fn dimensions(&self) -> usize {
        MINILM_DIMENSIONS
    }
}
