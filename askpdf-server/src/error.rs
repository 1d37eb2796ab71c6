//! Server error type and its HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Errors surfaced to HTTP clients.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The session has no document loaded.
    #[error("No document uploaded. Please upload a PDF file first.")]
    NoDocument,

    /// The upload request was malformed (missing field, wrong type).
    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    /// A failure from the retrieval core.
    #[error(transparent)]
    Rag(#[from] askpdf_rag::RagError),
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            ServerError::NoDocument => StatusCode::NOT_FOUND,
            ServerError::InvalidUpload(_) => StatusCode::BAD_REQUEST,
            // Build failures are the client's PDF, not our bug.
            ServerError::Rag(
                askpdf_rag::RagError::DocumentParse(_) | askpdf_rag::RagError::EmptyDocument,
            ) => StatusCode::UNPROCESSABLE_ENTITY,
            ServerError::Rag(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            ServerError::Rag(askpdf_rag::RagError::DocumentParse(_)) => {
                "Could not read this PDF. The file may be corrupt.".to_string()
            }
            ServerError::Rag(askpdf_rag::RagError::EmptyDocument) => {
                "No text could be extracted from the PDF.".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let body = json!({ "success": false, "message": self.message() });
        (self.status(), Json(body)).into_response()
    }
}
