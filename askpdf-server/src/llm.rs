//! Chat-completion client that answers questions from retrieved context.
//!
//! The model is reached over an OpenRouter-compatible chat completions
//! API. Failures never propagate: they map to apologetic user-facing
//! strings, matching the behavior of the retrieval boundary — a
//! question always gets *some* answer text back.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

const SYSTEM_PROMPT: &str = "You are a helpful assistant that answers strictly based on \
the provided context. If the answer cannot be found in the context, say \
'I cannot find this information in the document.'";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Produces an answer to a question given retrieved document context.
///
/// Implementations must not fail: upstream problems become apologetic
/// answer strings.
#[async_trait]
pub trait AnswerModel: Send + Sync {
    /// Answer `question` grounded in `context` (joined passage texts).
    async fn answer(&self, question: &str, context: &str) -> String;
}

/// An [`AnswerModel`] backed by an OpenRouter-compatible
/// `/chat/completions` endpoint.
pub struct OpenRouterModel {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenRouterModel {
    /// Default OpenRouter chat completions endpoint.
    pub const DEFAULT_ENDPOINT: &'static str = "https://openrouter.ai/api/v1/chat/completions";

    /// Create a client for the given API key and model slug.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            endpoint: Self::DEFAULT_ENDPOINT.to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Override the chat completions endpoint (for compatible gateways).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn build_prompt(question: &str, context: &str) -> String {
        format!(
            "Based on the following context from a PDF document, please answer the \
user's question. If the information is not available in the context, please say \
\"I cannot find this information in the document.\"\n\n\
Context from PDF:\n{context}\n\n\
User Question: {question}\n\n\
Please provide a helpful answer based only on the context above:"
        )
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[async_trait]
impl AnswerModel for OpenRouterModel {
    async fn answer(&self, question: &str, context: &str) -> String {
        let prompt = Self::build_prompt(question, context);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: SYSTEM_PROMPT },
                ChatMessage { role: "user", content: &prompt },
            ],
            max_tokens: 600,
            temperature: 0.4,
        };

        let response = match self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                error!(error = %e, "chat completion timed out");
                return "The request timed out. Please try again.".to_string();
            }
            Err(e) => {
                error!(error = %e, "chat completion request failed");
                return "The language model could not be reached. Please try again.".to_string();
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            error!(%status, "chat completion returned an error");
            return "The language model returned an error. Please check the API key or try again."
                .to_string();
        }

        match response.json::<ChatResponse>().await {
            Ok(parsed) => match parsed.choices.into_iter().next() {
                Some(choice) => {
                    info!(model = %self.model, "chat completion succeeded");
                    choice.message.content
                }
                None => "The language model returned an empty answer.".to_string(),
            },
            Err(e) => {
                error!(error = %e, "failed to parse chat completion response");
                "The language model returned an unreadable answer.".to_string()
            }
        }
    }
}
