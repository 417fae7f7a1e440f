use tracing::{debug, info};

use crate::database::{Note, NoteInput, NoteUpdate, Store, User};
use crate::error::ApiError;

const NOTE_NOT_FOUND: &str = "Note not Found";
const SUBJECT_NOT_FOUND: &str = "Subject not Found";

/// Note CRUD. Every lookup joins through the note's subject to the caller.
pub struct NoteService<'a> {
    store: &'a dyn Store,
}

impl<'a> NoteService<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    pub async fn create(&self, owner: &User, body: NoteInput) -> Result<Note, ApiError> {
        let note = self
            .store
            .insert_note(owner.id, &body)
            .await?
            .ok_or_else(|| ApiError::not_found(SUBJECT_NOT_FOUND))?;
        info!("User {} created note {} in subject {}", owner.id, note.id, note.subject_id);
        Ok(note)
    }

    pub async fn list(&self, owner: &User) -> Result<Vec<Note>, ApiError> {
        let notes = self.store.notes_for_owner(owner.id).await?;
        debug!("User {} listed {} notes", owner.id, notes.len());
        Ok(notes)
    }

    pub async fn get(&self, owner: &User, id: i64) -> Result<Note, ApiError> {
        self.store
            .note_for_owner(owner.id, id)
            .await?
            .ok_or_else(|| ApiError::not_found(NOTE_NOT_FOUND))
    }

    /// Overwrite every field. The target subject must also belong to the
    /// caller; otherwise the note is left as it was.
    pub async fn update(&self, owner: &User, id: i64, body: NoteInput) -> Result<Note, ApiError> {
        match self.store.update_note(owner.id, id, &body).await? {
            NoteUpdate::Updated(note) => {
                info!("User {} updated note {}", owner.id, id);
                Ok(note)
            }
            NoteUpdate::NoteMissing => Err(ApiError::not_found(NOTE_NOT_FOUND)),
            NoteUpdate::SubjectMissing => Err(ApiError::not_found(SUBJECT_NOT_FOUND)),
        }
    }

    pub async fn delete(&self, owner: &User, id: i64) -> Result<(), ApiError> {
        if !self.store.delete_note(owner.id, id).await? {
            return Err(ApiError::not_found(NOTE_NOT_FOUND));
        }
        info!("User {} deleted note {}", owner.id, id);
        Ok(())
    }
}
