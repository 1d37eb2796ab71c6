//! HTTP service for PDF question answering.
//!
//! Wires the `askpdf-rag` retrieval core to an axum router:
//! upload a PDF, ask questions answered by a chat model grounded in
//! retrieved passages, clear the session, inspect the loaded document.

pub mod error;
pub mod llm;
pub mod routes;
pub mod state;

pub use error::ServerError;
pub use llm::{AnswerModel, OpenRouterModel};
pub use routes::router;
pub use state::AppState;
