//! Shared server state: the retrieval engine and per-session documents.

use std::collections::HashMap;
use std::sync::Arc;

use askpdf_rag::{DocumentSession, RetrievalEngine};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::llm::AnswerModel;

/// State shared by all request handlers.
///
/// Each session id maps to its own [`DocumentSession`], so one user's
/// upload never touches another's; the engine and answer model are
/// stateless and shared.
pub struct AppState {
    pub engine: Arc<RetrievalEngine>,
    pub model: Arc<dyn AnswerModel>,
    sessions: RwLock<HashMap<Uuid, Arc<DocumentSession>>>,
}

impl AppState {
    /// Create shared state around an engine and answer model.
    pub fn new(engine: Arc<RetrievalEngine>, model: Arc<dyn AnswerModel>) -> Arc<Self> {
        Arc::new(Self { engine, model, sessions: RwLock::new(HashMap::new()) })
    }

    /// The session for `id`, created on first use.
    pub async fn session(&self, id: Uuid) -> Arc<DocumentSession> {
        if let Some(session) = self.sessions.read().await.get(&id) {
            return Arc::clone(session);
        }
        let mut sessions = self.sessions.write().await;
        Arc::clone(sessions.entry(id).or_default())
    }

    /// The session for `id` if it already exists.
    pub async fn existing_session(&self, id: Uuid) -> Option<Arc<DocumentSession>> {
        self.sessions.read().await.get(&id).cloned()
    }
}
