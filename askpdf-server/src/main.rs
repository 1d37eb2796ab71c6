//! askpdf server binary.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use askpdf_rag::{LocalEmbeddingProvider, RetrievalEngine};
use askpdf_server::{routes, AppState, OpenRouterModel};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr: SocketAddr = std::env::var("ASKPDF_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:8000".to_string())
        .parse()
        .context("ASKPDF_ADDR is not a valid socket address")?;
    let api_key =
        std::env::var("OPENROUTER_API_KEY").context("OPENROUTER_API_KEY must be set")?;
    let model_slug =
        std::env::var("OPENROUTER_MODEL").unwrap_or_else(|_| "deepseek/deepseek-chat".to_string());

    let provider = Arc::new(LocalEmbeddingProvider::load().await?);
    let engine = Arc::new(
        RetrievalEngine::builder().embedding_provider(provider).build()?,
    );
    let model = Arc::new(OpenRouterModel::new(api_key, model_slug));
    let state = AppState::new(engine, model);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "askpdf server listening");
    axum::serve(listener, routes::router(state)).await?;

    Ok(())
}
