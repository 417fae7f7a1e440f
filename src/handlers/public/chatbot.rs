use axum::extract::State;

use crate::api::Payload;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::chat_service::{self, ChatRequest, ChatResponse};
use crate::state::AppState;

/// POST /chatbot/generate - Markdown study notes for `query`
///
/// No token needed. Any upstream failure is a 500 with the failure detail.
pub async fn generate(
    State(state): State<AppState>,
    Payload(body): Payload<ChatRequest>,
) -> ApiResult<ChatResponse> {
    let response =
        chat_service::generate_notes(state.completions.as_ref(), &body.query, body.user_name())
            .await?;
    Ok(ApiResponse::success(ChatResponse { response }))
}
