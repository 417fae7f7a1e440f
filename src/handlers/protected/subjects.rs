use axum::extract::{Extension, State};

use crate::api::{IdPath, Payload};
use crate::database::Subject;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::services::SubjectInput;
use crate::state::AppState;

/// POST /subjects/create
pub async fn create(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Payload(body): Payload<SubjectInput>,
) -> ApiResult<Subject> {
    let subject = state.subjects().create(&user, body).await?;
    Ok(ApiResponse::created(subject))
}

/// GET /subjects/get
pub async fn list(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Vec<Subject>> {
    let subjects = state.subjects().list(&user).await?;
    Ok(ApiResponse::success(subjects))
}

/// GET /subjects/get_subject/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    IdPath(id): IdPath,
) -> ApiResult<Subject> {
    let subject = state.subjects().get(&user, id).await?;
    Ok(ApiResponse::success(subject))
}

/// PUT /subjects/update/:id - responds 201, not 200
pub async fn update(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    IdPath(id): IdPath,
    Payload(body): Payload<SubjectInput>,
) -> ApiResult<Subject> {
    let subject = state.subjects().update(&user, id, body).await?;
    Ok(ApiResponse::created(subject))
}

/// DELETE /subjects/delete/:id - also removes the subject's notes
pub async fn delete(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    IdPath(id): IdPath,
) -> ApiResult<()> {
    state.subjects().delete(&user, id).await?;
    Ok(ApiResponse::no_content())
}
