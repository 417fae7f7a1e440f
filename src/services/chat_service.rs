use serde::{Deserialize, Serialize};
use tracing::info;

use crate::llm::{CompletionBackend, CompletionRequest, LlmError};

pub const MAX_TOKENS: u32 = 500;
pub const TEMPERATURE: f32 = 0.7;

/// Greeting name used when the request carries none
pub const DEFAULT_USER_NAME: &str = "Student";

const PROMPT_TEMPLATE: &str = r#"
You are Smart Notes Assistant for students.

Student name: {user_name}
Requested question: {question}

Your task:
1. Start with a short greeting to the student using their name.
2. Write clear, exam-oriented notes.
3. Keep explanations step-by-step and practical.
4. Include real-world examples.
5. End with short Q&A revision points.

Formatting rules (strict):
- Respond in Markdown.
- Use headings: `#`, `##`, `###`
- Use short paragraphs.
- Use bullet points where useful.
- Use **bold** only for important terms.
- Keep language simple and concise.
"#;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub query: String,
    #[serde(default)]
    pub user_name: Option<String>,
}

impl ChatRequest {
    /// The trimmed `user_name`, or `DEFAULT_USER_NAME` when missing or blank
    pub fn user_name(&self) -> &str {
        self.user_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_USER_NAME)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

pub fn render_prompt(question: &str, user_name: &str) -> String {
    PROMPT_TEMPLATE
        .replacen("{user_name}", user_name, 1)
        .replacen("{question}", question, 1)
}

/// Ask the completion backend for Markdown study notes on `question`
pub async fn generate_notes(
    backend: &dyn CompletionBackend,
    question: &str,
    user_name: &str,
) -> Result<String, LlmError> {
    let request = CompletionRequest {
        prompt: render_prompt(question, user_name),
        max_tokens: MAX_TOKENS,
        temperature: TEMPERATURE,
    };

    let text = backend.complete(&request).await?;
    info!(
        "Generated {} characters of notes with {}",
        text.len(),
        backend.model_name()
    );
    Ok(text)
}
