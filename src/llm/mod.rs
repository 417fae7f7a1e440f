//! Completion backends used to generate study notes.

pub mod groq;
pub mod mock;
mod types;

use async_trait::async_trait;
use thiserror::Error;

pub use groq::GroqBackend;
pub use mock::MockCompletions;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("{0}")]
    Upstream(String),

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// A single-prompt completion call with fixed sampling settings
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Send the prompt and return the generated text. No retries.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError>;

    fn model_name(&self) -> &str;
}
