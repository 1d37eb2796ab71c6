//! Remote embedding provider for OpenAI-compatible endpoints.
//!
//! Only available with the `remote` feature. Talks to any gateway that
//! serves `/v1/embeddings` (TEI, vLLM, OpenAI itself), so the same
//! sentence-transformer the local provider runs can instead be hosted
//! elsewhere. Remember that the retrieval distance threshold is tuned
//! per model — point this at a different model and re-calibrate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

const DEFAULT_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";
const DEFAULT_DIMENSIONS: usize = 384;

/// An [`EmbeddingProvider`] backed by a remote `/v1/embeddings`
/// endpoint.
///
/// # Example
///
/// ```rust,ignore
/// use askpdf_rag::RemoteEmbeddingProvider;
///
/// let provider = RemoteEmbeddingProvider::new("http://localhost:8080", "")?
///     .with_model("sentence-transformers/all-MiniLM-L6-v2")
///     .with_dimensions(384);
/// let vector = provider.embed("hello world").await?;
/// ```
pub struct RemoteEmbeddingProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    dimensions: usize,
}

impl RemoteEmbeddingProvider {
    /// Create a provider pointed at `base_url` (no trailing slash).
    ///
    /// Pass an empty `api_key` for endpoints that do not authenticate.
    pub fn new(base_url: impl AsRef<str>, api_key: impl Into<String>) -> Result<Self> {
        let base = base_url.as_ref().trim_end_matches('/');
        if base.is_empty() {
            return Err(RagError::Embedding {
                provider: "remote".into(),
                message: "base URL must not be empty".into(),
            });
        }
        let api_key = api_key.into();

        Ok(Self {
            client: reqwest::Client::new(),
            endpoint: format!("{base}/v1/embeddings"),
            api_key: (!api_key.is_empty()).then_some(api_key),
            model: DEFAULT_MODEL.into(),
            dimensions: DEFAULT_DIMENSIONS,
        })
    }

    /// Set the model name sent with every request.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the expected output dimension.
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }
}

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingRow>,
}

#[derive(Deserialize)]
struct EmbeddingRow {
    embedding: Vec<f32>,
}

#[async_trait]
impl EmbeddingProvider for RemoteEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_batch(&[text]).await?;
        vectors.pop().ok_or_else(|| RagError::Embedding {
            provider: "remote".into(),
            message: "endpoint returned no vector".into(),
        })
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        debug!(batch_size = texts.len(), model = %self.model, "embedding batch remotely");

        let body = EmbeddingsRequest { model: &self.model, input: texts.to_vec() };
        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            error!(error = %e, "embedding request failed");
            RagError::Embedding { provider: "remote".into(), message: format!("request failed: {e}") }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            error!(%status, "embedding endpoint returned an error");
            return Err(RagError::Embedding {
                provider: "remote".into(),
                message: format!("endpoint returned {status}: {detail}"),
            });
        }

        let parsed: EmbeddingsResponse = response.json().await.map_err(|e| RagError::Embedding {
            provider: "remote".into(),
            message: format!("failed to parse response: {e}"),
        })?;

        let vectors: Vec<Vec<f32>> = parsed.data.into_iter().map(|row| row.embedding).collect();
        for vector in &vectors {
            if vector.len() != self.dimensions {
                return Err(RagError::Embedding {
                    provider: "remote".into(),
                    message: format!(
                        "endpoint returned dimension {}, expected {}",
                        vector.len(),
                        self.dimensions
                    ),
                });
            }
        }
        Ok(vectors)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
