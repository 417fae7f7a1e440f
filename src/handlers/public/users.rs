use axum::extract::State;

use crate::api::Payload;
use crate::database::User;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{LoginRequest, RegisterRequest, TokenResponse};
use crate::state::AppState;

/// POST /users/register - create an account
///
/// Body: `{name, username, email, password}`. Responds 201 with the user
/// (without the password hash), 409 when the username or email is taken.
pub async fn register(
    State(state): State<AppState>,
    Payload(body): Payload<RegisterRequest>,
) -> ApiResult<User> {
    let user = state.users().register(body).await?;
    Ok(ApiResponse::created(user))
}

/// POST /users/login - exchange credentials for a bearer token
///
/// Responds `{token}`, or 401 for an unknown username or wrong password.
pub async fn login(
    State(state): State<AppState>,
    Payload(body): Payload<LoginRequest>,
) -> ApiResult<TokenResponse> {
    let token = state.users().login(body).await?;
    Ok(ApiResponse::success(token))
}
