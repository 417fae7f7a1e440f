use axum::{
    extract::{Request, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::state::AppState;

/// GET / - the frontend entry file when it has been built, otherwise a
/// plain status message
pub async fn home(State(state): State<AppState>, request: Request) -> Response {
    let index = state.config.server.frontend_dir.join("index.html");
    if tokio::fs::try_exists(&index).await.unwrap_or(false) {
        match ServeFile::new(&index).oneshot(request).await {
            Ok(response) => return response.into_response(),
            Err(never) => match never {},
        }
    }

    Json(json!({
        "message": "Backend is running. Frontend dev server expected at http://127.0.0.1:8080"
    }))
    .into_response()
}

/// GET /health - liveness plus a store ping
pub async fn health(State(state): State<AppState>) -> Response {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                })),
            )
                .into_response()
        }
    }
}
