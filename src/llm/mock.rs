//! Deterministic completion backend for tests and offline runs.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use super::{CompletionBackend, CompletionRequest, LlmError};

/// Replies with a fixed text (or a fixed failure) and records every request
#[derive(Clone)]
pub struct MockCompletions {
    reply: Result<String, String>,
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockCompletions {
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            reply: Ok(text.into()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Err(message.into()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CompletionBackend for MockCompletions {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(request.clone());
        }
        self.reply.clone().map_err(LlmError::Upstream)
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
