use serde::Deserialize;
use tracing::{debug, info};

use crate::database::{Store, Subject, User};
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct SubjectInput {
    pub title: String,
}

const SUBJECT_NOT_FOUND: &str = "Subject not Found";

/// Subject CRUD, always scoped to the calling user
pub struct SubjectService<'a> {
    store: &'a dyn Store,
}

impl<'a> SubjectService<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    pub async fn create(&self, owner: &User, body: SubjectInput) -> Result<Subject, ApiError> {
        let subject = self.store.insert_subject(owner.id, &body.title).await?;
        info!("User {} created subject {}", owner.id, subject.id);
        Ok(subject)
    }

    pub async fn list(&self, owner: &User) -> Result<Vec<Subject>, ApiError> {
        let subjects = self.store.subjects_for_owner(owner.id).await?;
        debug!("User {} listed {} subjects", owner.id, subjects.len());
        Ok(subjects)
    }

    /// Subjects owned by someone else are reported as missing
    pub async fn get(&self, owner: &User, id: i64) -> Result<Subject, ApiError> {
        self.store
            .subject_for_owner(owner.id, id)
            .await?
            .ok_or_else(|| ApiError::not_found(SUBJECT_NOT_FOUND))
    }

    pub async fn update(&self, owner: &User, id: i64, body: SubjectInput) -> Result<Subject, ApiError> {
        let subject = self
            .store
            .update_subject(owner.id, id, &body.title)
            .await?
            .ok_or_else(|| ApiError::not_found(SUBJECT_NOT_FOUND))?;
        info!("User {} updated subject {}", owner.id, id);
        Ok(subject)
    }

    /// Delete the subject and every note filed under it
    pub async fn delete(&self, owner: &User, id: i64) -> Result<(), ApiError> {
        if !self.store.delete_subject(owner.id, id).await? {
            return Err(ApiError::not_found(SUBJECT_NOT_FOUND));
        }
        info!("User {} deleted subject {}", owner.id, id);
        Ok(())
    }
}
