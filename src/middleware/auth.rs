use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::database::User;
use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated caller, resolved once per request by `require_user`
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

/// Authentication middleware for protected routes: validates the bearer
/// token, reloads the user it names and injects it as `CurrentUser`.
pub async fn require_user(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = state.users().authenticate(request.headers()).await?;

    tracing::debug!("Authenticated request as user {}", user.id);
    request.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(request).await)
}
