pub mod factory;
pub mod openai;

use async_trait::async_trait;
use cloudclaw_core::types::Message;
use thiserror::Error;

pub use openai::OpenAIProvider;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Network error: {0}")]
    NetworkError(String),
}

#[derive(Debug, Clone)]
pub struct GenerationOptions {
    pub model: String,
    pub max_tokens: Option<usize>,
    pub temperature: Option<f64>,
}

/// What the model sent back: free text, tool-call proposals, or both.
/// An empty `tool_calls` means no tool matched the user's request.
#[derive(Debug, Clone)]
pub struct GenerationResponse {
    pub content: String,
    pub tool_calls: Vec<ToolCall>,
    pub usage: Option<Usage>,
}

/// A proposed tool invocation. `arguments` is the raw JSON string exactly as
/// the API returned it; parsing and validation happen downstream.
#[derive(Debug, Clone)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: String,
}

#[derive(Debug, Clone)]
pub struct Usage {
    pub input_tokens: usize,
    pub output_tokens: usize,
}

/// The language-understanding boundary. One call per turn; everything the
/// model needs (system prompt, transcript window, tool definitions) goes in
/// through the arguments, and all non-determinism stays behind this trait.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    async fn chat(
        &self,
        messages: &[Message],
        tools: &[serde_json::Value],
        options: &GenerationOptions,
    ) -> Result<GenerationResponse, ProviderError>;
}
