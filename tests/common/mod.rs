#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use smart_notes_api::config::AppConfig;
use smart_notes_api::database::{MemoryStore, Store};
use smart_notes_api::llm::{CompletionBackend, MockCompletions};
use smart_notes_api::{app, AppState};

pub const PASSWORD: &str = "correct horse battery";

/// The whole router wired to an in-memory store and a fake completion backend
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

pub fn test_config(frontend_dir: &Path) -> AppConfig {
    let vars: HashMap<&str, String> = HashMap::from([
        ("DATABASE_URL", "memory://".to_string()),
        ("SECRET_KEY", "integration-test-secret".to_string()),
        ("ALGORITHM", "HS256".to_string()),
        ("EXP_TIME", "30".to_string()),
        ("GROQ_API_KEY", "gsk_test".to_string()),
        ("FRONTEND_DIR", frontend_dir.display().to_string()),
    ]);
    AppConfig::from_lookup(|key| vars.get(key).cloned()).expect("test config")
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_backend(Arc::new(MockCompletions::replying(
            "# Hello Ada\n\n## Recursion\n\n- A function that calls itself",
        )))
    }

    pub fn with_backend(completions: Arc<dyn CompletionBackend>) -> Self {
        Self::with_frontend_dir(completions, Path::new("/nonexistent/frontend/dist"))
    }

    pub fn with_frontend_dir(completions: Arc<dyn CompletionBackend>, dir: &Path) -> Self {
        Self::build(Arc::new(MemoryStore::new()), completions, dir)
    }

    /// Same router over a caller-supplied store, e.g. a Postgres test pool
    pub fn with_store(store: Arc<dyn Store>) -> Self {
        Self::build(
            store,
            Arc::new(MockCompletions::replying("notes")),
            Path::new("/nonexistent/frontend/dist"),
        )
    }

    fn build(store: Arc<dyn Store>, completions: Arc<dyn CompletionBackend>, dir: &Path) -> Self {
        let state = AppState::new(test_config(dir), store, completions);
        Self {
            router: app(state.clone()),
            state,
        }
    }

    /// Send a request and return the status with the parsed JSON body
    /// (`Value::Null` for empty bodies)
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .with_context(|| format!("non-JSON body: {}", String::from_utf8_lossy(&bytes)))?
        };
        Ok((status, value))
    }

    pub async fn get(&self, uri: &str, token: &str) -> Result<(StatusCode, Value)> {
        self.send(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> Result<(StatusCode, Value)> {
        self.send(Method::DELETE, uri, Some(token), None).await
    }

    pub async fn register(&self, username: &str) -> Result<(StatusCode, Value)> {
        self.send(
            Method::POST,
            "/users/register",
            None,
            Some(json!({
                "name": format!("{} Tester", username),
                "username": username,
                "email": format!("{}@example.com", username),
                "password": PASSWORD,
            })),
        )
        .await
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<(StatusCode, Value)> {
        self.send(
            Method::POST,
            "/users/login",
            None,
            Some(json!({ "username": username, "password": password })),
        )
        .await
    }

    /// Register `username` and return a bearer token for it
    pub async fn signup(&self, username: &str) -> Result<String> {
        let (status, _) = self.register(username).await?;
        anyhow::ensure!(status == StatusCode::CREATED, "register returned {}", status);
        let (status, body) = self.login(username, PASSWORD).await?;
        anyhow::ensure!(status == StatusCode::OK, "login returned {}", status);
        body["token"]
            .as_str()
            .map(str::to_string)
            .context("login response has no token")
    }

    pub async fn create_subject(&self, token: &str, title: &str) -> Result<i64> {
        let (status, body) = self
            .post("/subjects/create", token, json!({ "title": title }))
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "create subject returned {}: {}", status, body);
        body["id"].as_i64().context("subject has no id")
    }

    pub async fn create_note(&self, token: &str, subject_id: i64, title: &str) -> Result<i64> {
        let (status, body) = self
            .post(
                "/notes/create",
                token,
                json!({ "title": title, "content": format!("{} body", title), "subject_id": subject_id }),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "create note returned {}: {}", status, body);
        body["id"].as_i64().context("note has no id")
    }
}
