use std::sync::Arc;

use crate::auth::TokenIssuer;
use crate::config::AppConfig;
use crate::database::Store;
use crate::llm::CompletionBackend;
use crate::services::{NoteService, SubjectService, UserService};

/// Everything a request handler needs, built once at startup and cloned
/// cheaply into each request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn Store>,
    pub tokens: TokenIssuer,
    pub completions: Arc<dyn CompletionBackend>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn Store>,
        completions: Arc<dyn CompletionBackend>,
    ) -> Self {
        let tokens = TokenIssuer::new(&config.security);
        Self {
            config: Arc::new(config),
            store,
            tokens,
            completions,
        }
    }

    pub fn users(&self) -> UserService<'_> {
        UserService::new(self.store.as_ref(), &self.tokens)
    }

    pub fn subjects(&self) -> SubjectService<'_> {
        SubjectService::new(self.store.as_ref())
    }

    pub fn notes(&self) -> NoteService<'_> {
        NoteService::new(self.store.as_ref())
    }
}
