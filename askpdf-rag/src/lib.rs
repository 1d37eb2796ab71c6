//! Retrieval core for PDF question answering.
//!
//! This crate turns an uploaded PDF into searchable passages and
//! retrieves the most relevant ones for a natural-language query:
//!
//! - cascading per-page text extraction with a structural fallback
//! - sentence-aware chunking into bounded, page-tagged passages
//! - an [`EmbeddingProvider`] seam with a local all-MiniLM-L6-v2
//!   implementation (and a remote one behind the `remote` feature)
//! - exact squared-L2 nearest-neighbor search over a flat index
//! - a retrieval engine with distance filtering, dedup, and fallbacks
//!   that never fail past the retrieve boundary
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use askpdf_rag::{LocalEmbeddingProvider, RetrievalEngine};
//!
//! let provider = Arc::new(LocalEmbeddingProvider::load().await?);
//! let engine = RetrievalEngine::builder().embedding_provider(provider).build()?;
//!
//! let document = engine.build_document(&pdf_bytes).await?;
//! let retrieved = engine.retrieve(&document, "What is the warranty period?").await;
//! for passage in &retrieved.passages {
//!     println!("{passage}");
//! }
//! ```

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod extract;
pub mod index;
pub mod local;
#[cfg(feature = "remote")]
pub mod remote;
pub mod retrieval;
pub mod session;

pub use chunking::{Chunker, SentenceChunker};
pub use config::{RagConfig, RagConfigBuilder};
pub use document::{Document, DocumentInfo, Passage, Retrieved, RetrievalSource};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use extract::{ExtractionStrategy, PdfSource, TextExtractor};
pub use index::{FlatIndex, Neighbor};
pub use local::LocalEmbeddingProvider;
#[cfg(feature = "remote")]
pub use remote::RemoteEmbeddingProvider;
pub use retrieval::{RetrievalEngine, RetrievalEngineBuilder};
pub use session::DocumentSession;
