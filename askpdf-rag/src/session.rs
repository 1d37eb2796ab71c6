//! Session-scoped ownership of one indexed document.
//!
//! Replaces a shared lookup table of live documents with an explicit
//! handle: whoever holds the [`DocumentSession`] owns its document,
//! and retrieval calls receive the document reference directly.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::document::Document;

/// A handle binding one uploaded document to a logical session.
///
/// A new upload replaces the whole document by swapping the `Arc`, so
/// an in-flight retrieval finishes against whichever fully-built
/// document it cloned — never a half-built one. Reads take the lock
/// only long enough to clone the `Arc`.
#[derive(Debug, Default)]
pub struct DocumentSession {
    current: RwLock<Option<Arc<Document>>>,
}

impl DocumentSession {
    /// Create a session with no document loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the session's document with a newly built one.
    pub async fn replace(&self, document: Document) {
        let document = Arc::new(document);
        info!(passage_count = document.len(), "document replaced in session");
        *self.current.write().await = Some(document);
    }

    /// Drop the session's document, if any.
    pub async fn clear(&self) {
        *self.current.write().await = None;
    }

    /// The currently loaded document, if any.
    pub async fn document(&self) -> Option<Arc<Document>> {
        self.current.read().await.clone()
    }

    /// Whether a document is loaded.
    pub async fn has_document(&self) -> bool {
        self.current.read().await.is_some()
    }
}
