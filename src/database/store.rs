use async_trait::async_trait;

use super::models::{NewUser, Note, NoteInput, Subject, User};
use super::DatabaseError;

/// Outcome of an owner-scoped note overwrite
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteUpdate {
    Updated(Note),
    /// The note does not exist or sits under a subject the caller does not own
    NoteMissing,
    /// The target subject does not exist or is not owned by the caller
    SubjectMissing,
}

/// Persistence operations. Subject and note access is only offered scoped to
/// an owner id, so a note can never be reached without walking
/// note -> subject -> user.
///
/// Each method is one unit of work: it either commits entirely or leaves the
/// store unchanged.
#[async_trait]
pub trait Store: Send + Sync {
    async fn health_check(&self) -> Result<(), DatabaseError>;

    // Users
    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError>;
    async fn user_by_id(&self, id: i64) -> Result<Option<User>, DatabaseError>;
    async fn user_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError>;
    async fn user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;
    async fn update_user_profile(
        &self,
        id: i64,
        name: &str,
        username: &str,
    ) -> Result<Option<User>, DatabaseError>;
    /// Deletes the user together with their subjects and notes
    async fn delete_user(&self, id: i64) -> Result<bool, DatabaseError>;

    // Subjects
    async fn insert_subject(&self, owner: i64, title: &str) -> Result<Subject, DatabaseError>;
    async fn subjects_for_owner(&self, owner: i64) -> Result<Vec<Subject>, DatabaseError>;
    async fn subject_for_owner(&self, owner: i64, id: i64)
        -> Result<Option<Subject>, DatabaseError>;
    async fn update_subject(
        &self,
        owner: i64,
        id: i64,
        title: &str,
    ) -> Result<Option<Subject>, DatabaseError>;
    /// Deletes the subject together with its notes
    async fn delete_subject(&self, owner: i64, id: i64) -> Result<bool, DatabaseError>;

    // Notes
    /// Returns `None` when `note.subject_id` is not a subject owned by `owner`
    async fn insert_note(&self, owner: i64, note: &NoteInput)
        -> Result<Option<Note>, DatabaseError>;
    async fn notes_for_owner(&self, owner: i64) -> Result<Vec<Note>, DatabaseError>;
    async fn note_for_owner(&self, owner: i64, id: i64) -> Result<Option<Note>, DatabaseError>;
    async fn update_note(
        &self,
        owner: i64,
        id: i64,
        note: &NoteInput,
    ) -> Result<NoteUpdate, DatabaseError>;
    async fn delete_note(&self, owner: i64, id: i64) -> Result<bool, DatabaseError>;
}
