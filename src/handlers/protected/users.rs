use axum::extract::{Extension, State};

use crate::api::Payload;
use crate::database::User;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::services::ProfileUpdate;
use crate::state::AppState;

/// GET /users/is_auth - the user the bearer token belongs to
pub async fn is_auth(Extension(CurrentUser(user)): Extension<CurrentUser>) -> ApiResult<User> {
    Ok(ApiResponse::success(user))
}

/// PUT /users/profile - overwrite name and username
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Payload(body): Payload<ProfileUpdate>,
) -> ApiResult<User> {
    let updated = state.users().update_profile(&user, body).await?;
    Ok(ApiResponse::success(updated))
}

/// DELETE /users/profile - delete the account, its subjects and notes
pub async fn delete_profile(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<()> {
    state.users().delete_account(&user).await?;
    Ok(ApiResponse::no_content())
}
