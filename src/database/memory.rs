use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::models::{NewUser, Note, NoteInput, Subject, User};
use super::store::{NoteUpdate, Store};
use super::{DatabaseError, EMAIL_TAKEN, SUBJECT_TAKEN, USERNAME_TAKEN};

/// In-process store with the same constraints as the Postgres schema:
/// unique usernames, emails and subject titles, cascading deletes.
/// Each operation holds the lock for its whole duration.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    subjects: BTreeMap<i64, Subject>,
    notes: BTreeMap<i64, Note>,
    user_seq: i64,
    subject_seq: i64,
    note_seq: i64,
}

fn next_id(seq: &mut i64) -> i64 {
    *seq += 1;
    *seq
}

impl Tables {
    fn owns_subject(&self, owner: i64, subject_id: i64) -> bool {
        self.subjects
            .get(&subject_id)
            .map_or(false, |s| s.user_id == owner)
    }

    fn owns_note(&self, owner: i64, note_id: i64) -> bool {
        self.notes
            .get(&note_id)
            .map_or(false, |n| self.owns_subject(owner, n.subject_id))
    }

    fn title_taken(&self, title: &str, except: Option<i64>) -> bool {
        self.subjects
            .values()
            .any(|s| s.title == title && Some(s.id) != except)
    }

    fn remove_subject(&mut self, subject_id: i64) {
        self.subjects.remove(&subject_id);
        self.notes.retain(|_, n| n.subject_id != subject_id);
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(DatabaseError::UniqueViolation(USERNAME_TAKEN.to_string()));
        }
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(DatabaseError::UniqueViolation(EMAIL_TAKEN.to_string()));
        }

        let id = next_id(&mut tables.user_seq);
        let row = User {
            id,
            name: user.name,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        tables.users.insert(id, row.clone());
        Ok(row)
    }

    async fn user_by_id(&self, id: i64) -> Result<Option<User>, DatabaseError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn update_user_profile(
        &self,
        id: i64,
        name: &str,
        username: &str,
    ) -> Result<Option<User>, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .values()
            .any(|u| u.username == username && u.id != id)
        {
            return Err(DatabaseError::UniqueViolation(USERNAME_TAKEN.to_string()));
        }

        Ok(tables.users.get_mut(&id).map(|user| {
            user.name = name.to_string();
            user.username = username.to_string();
            user.clone()
        }))
    }

    async fn delete_user(&self, id: i64) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }

        let owned: Vec<i64> = tables
            .subjects
            .values()
            .filter(|s| s.user_id == id)
            .map(|s| s.id)
            .collect();
        for subject_id in owned {
            tables.remove_subject(subject_id);
        }
        Ok(true)
    }

    async fn insert_subject(&self, owner: i64, title: &str) -> Result<Subject, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.title_taken(title, None) {
            return Err(DatabaseError::UniqueViolation(SUBJECT_TAKEN.to_string()));
        }

        let id = next_id(&mut tables.subject_seq);
        let row = Subject {
            id,
            title: title.to_string(),
            user_id: owner,
        };
        tables.subjects.insert(id, row.clone());
        Ok(row)
    }

    async fn subjects_for_owner(&self, owner: i64) -> Result<Vec<Subject>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .subjects
            .values()
            .filter(|s| s.user_id == owner)
            .cloned()
            .collect())
    }

    async fn subject_for_owner(
        &self,
        owner: i64,
        id: i64,
    ) -> Result<Option<Subject>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .subjects
            .get(&id)
            .filter(|s| s.user_id == owner)
            .cloned())
    }

    async fn update_subject(
        &self,
        owner: i64,
        id: i64,
        title: &str,
    ) -> Result<Option<Subject>, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.owns_subject(owner, id) {
            return Ok(None);
        }
        if tables.title_taken(title, Some(id)) {
            return Err(DatabaseError::UniqueViolation(SUBJECT_TAKEN.to_string()));
        }

        Ok(tables.subjects.get_mut(&id).map(|subject| {
            subject.title = title.to_string();
            subject.clone()
        }))
    }

    async fn delete_subject(&self, owner: i64, id: i64) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.owns_subject(owner, id) {
            return Ok(false);
        }
        tables.remove_subject(id);
        Ok(true)
    }

    async fn insert_note(
        &self,
        owner: i64,
        note: &NoteInput,
    ) -> Result<Option<Note>, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.owns_subject(owner, note.subject_id) {
            return Ok(None);
        }

        let id = next_id(&mut tables.note_seq);
        let row = Note {
            id,
            title: note.title.clone(),
            content: note.content.clone(),
            subject_id: note.subject_id,
            created_at: Utc::now(),
        };
        tables.notes.insert(id, row.clone());
        Ok(Some(row))
    }

    async fn notes_for_owner(&self, owner: i64) -> Result<Vec<Note>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .notes
            .values()
            .filter(|n| tables.owns_subject(owner, n.subject_id))
            .cloned()
            .collect())
    }

    async fn note_for_owner(&self, owner: i64, id: i64) -> Result<Option<Note>, DatabaseError> {
        let tables = self.tables.read().await;
        if !tables.owns_note(owner, id) {
            return Ok(None);
        }
        Ok(tables.notes.get(&id).cloned())
    }

    async fn update_note(
        &self,
        owner: i64,
        id: i64,
        note: &NoteInput,
    ) -> Result<NoteUpdate, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.owns_note(owner, id) {
            return Ok(NoteUpdate::NoteMissing);
        }
        if !tables.owns_subject(owner, note.subject_id) {
            return Ok(NoteUpdate::SubjectMissing);
        }

        Ok(match tables.notes.get_mut(&id) {
            Some(row) => {
                row.title = note.title.clone();
                row.content = note.content.clone();
                row.subject_id = note.subject_id;
                NoteUpdate::Updated(row.clone())
            }
            None => NoteUpdate::NoteMissing,
        })
    }

    async fn delete_note(&self, owner: i64, id: i64) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.owns_note(owner, id) {
            return Ok(false);
        }
        Ok(tables.notes.remove(&id).is_some())
    }
}
