use axum::extract::{Extension, State};

use crate::api::{IdPath, Payload};
use crate::database::{Note, NoteInput};
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::state::AppState;

/// POST /notes/create
pub async fn create(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Payload(body): Payload<NoteInput>,
) -> ApiResult<Note> {
    let note = state.notes().create(&user, body).await?;
    Ok(ApiResponse::created(note))
}

/// GET /notes/get
pub async fn list(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Vec<Note>> {
    let notes = state.notes().list(&user).await?;
    Ok(ApiResponse::success(notes))
}

/// GET /notes/get_note/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    IdPath(id): IdPath,
) -> ApiResult<Note> {
    let note = state.notes().get(&user, id).await?;
    Ok(ApiResponse::success(note))
}

/// PUT /notes/update/:id - responds 201, not 200
pub async fn update(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    IdPath(id): IdPath,
    Payload(body): Payload<NoteInput>,
) -> ApiResult<Note> {
    let note = state.notes().update(&user, id, body).await?;
    Ok(ApiResponse::created(note))
}

/// DELETE /notes/delete/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    IdPath(id): IdPath,
) -> ApiResult<()> {
    state.notes().delete(&user, id).await?;
    Ok(ApiResponse::no_content())
}
