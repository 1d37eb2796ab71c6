//! HTTP routes: upload, ask, clear, and document diagnostics.

use std::sync::Arc;

use askpdf_rag::DocumentInfo;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use crate::error::ServerError;
use crate::state::AppState;

/// Upload size cap: 16 MiB, same as the body limit most PDF upload
/// forms are configured with.
const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Header carrying the client's session id.
const SESSION_HEADER: &str = "x-session-id";

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/upload", post(upload))
        .route("/api/ask", post(ask))
        .route("/api/clear", post(clear))
        .route("/api/document", get(document_info))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Session id from the request header, or a fresh one. The id is
/// echoed in every response so clients can stick to it.
fn session_id(headers: &HeaderMap) -> Uuid {
    headers
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value).ok())
        .unwrap_or_else(Uuid::new_v4)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

#[derive(Debug, Serialize)]
struct UploadResponse {
    success: bool,
    message: String,
    session_id: Uuid,
    file_name: String,
    total_passages: usize,
}

async fn upload(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ServerError> {
    let session_id = session_id(&headers);

    let mut file_name = None;
    let mut bytes = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::InvalidUpload(format!("unreadable multipart body: {e}")))?
    {
        if field.name() == Some("pdf") {
            file_name = field.file_name().map(|name| name.to_string());
            bytes = Some(field.bytes().await.map_err(|e| {
                ServerError::InvalidUpload(format!("failed to read file body: {e}"))
            })?);
        }
    }

    let bytes = bytes.ok_or_else(|| ServerError::InvalidUpload("no file selected".to_string()))?;
    let file_name = file_name.unwrap_or_default();
    if !file_name.to_lowercase().ends_with(".pdf") {
        return Err(ServerError::InvalidUpload(
            "invalid file type, please upload a PDF".to_string(),
        ));
    }

    info!(%session_id, file = %file_name, size = bytes.len(), "file uploaded");

    let document = state.engine.build_document(&bytes).await?;
    let total_passages = document.len();
    state.session(session_id).await.replace(document).await;

    Ok(Json(UploadResponse {
        success: true,
        message: "File uploaded successfully!".to_string(),
        session_id,
        file_name,
        total_passages,
    }))
}

#[derive(Debug, Deserialize)]
struct AskRequest {
    message: String,
}

#[derive(Debug, Serialize)]
struct AskResponse {
    response: String,
    session_id: Uuid,
    context_count: usize,
}

async fn ask(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<AskRequest>,
) -> Json<AskResponse> {
    let session_id = session_id(&headers);
    let question = request.message.trim();

    if question.is_empty() {
        return Json(AskResponse {
            response: "Please enter a question.".to_string(),
            session_id,
            context_count: 0,
        });
    }

    let document = match state.existing_session(session_id).await {
        Some(session) => session.document().await,
        None => None,
    };
    let Some(document) = document else {
        return Json(AskResponse {
            response: "Please upload a PDF file first.".to_string(),
            session_id,
            context_count: 0,
        });
    };

    info!(%session_id, question, "answering question");
    let retrieved = state.engine.retrieve(&document, question).await;
    let context = retrieved.passages.join("\n");
    let answer = state.model.answer(question, &context).await;

    Json(AskResponse { response: answer, session_id, context_count: retrieved.passages.len() })
}

#[derive(Debug, Serialize)]
struct ClearResponse {
    success: bool,
    message: String,
    session_id: Uuid,
}

async fn clear(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Json<ClearResponse> {
    let session_id = session_id(&headers);
    if let Some(session) = state.existing_session(session_id).await {
        session.clear().await;
    }
    Json(ClearResponse {
        success: true,
        message: "Document cleared successfully".to_string(),
        session_id,
    })
}

async fn document_info(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<DocumentInfo>, ServerError> {
    let session_id = session_id(&headers);
    let document = match state.existing_session(session_id).await {
        Some(session) => session.document().await,
        None => None,
    };
    let document = document.ok_or(ServerError::NoDocument)?;
    Ok(Json(state.engine.document_info(&document)))
}
