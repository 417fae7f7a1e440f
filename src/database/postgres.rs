use async_trait::async_trait;
use sqlx::PgPool;

use super::manager::DatabaseManager;
use super::models::{NewUser, Note, NoteInput, Subject, User};
use super::store::{NoteUpdate, Store};
use super::DatabaseError;

const USER_COLUMNS: &str = "id, name, username, email, password_hash, created_at";
const NOTE_COLUMNS: &str = "n.id, n.title, n.content, n.subject_id, n.created_at";

/// Postgres-backed store. Every query that touches subjects or notes carries
/// the owner id in its WHERE clause.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let query = format!(
            "INSERT INTO users (name, username, email, password_hash) VALUES ($1, $2, $3, $4) RETURNING {}",
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, User>(&query)
            .bind(&user.name)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn user_by_id(&self, id: i64) -> Result<Option<User>, DatabaseError> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let query = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let query = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_user_profile(
        &self,
        id: i64,
        name: &str,
        username: &str,
    ) -> Result<Option<User>, DatabaseError> {
        let query = format!(
            "UPDATE users SET name = $2, username = $3 WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(name)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete_user(&self, id: i64) -> Result<bool, DatabaseError> {
        // subjects and notes go with it through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_subject(&self, owner: i64, title: &str) -> Result<Subject, DatabaseError> {
        let row = sqlx::query_as::<_, Subject>(
            "INSERT INTO subjects (title, user_id) VALUES ($1, $2) RETURNING id, title, user_id",
        )
        .bind(title)
        .bind(owner)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn subjects_for_owner(&self, owner: i64) -> Result<Vec<Subject>, DatabaseError> {
        let rows = sqlx::query_as::<_, Subject>(
            "SELECT id, title, user_id FROM subjects WHERE user_id = $1 ORDER BY id",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn subject_for_owner(
        &self,
        owner: i64,
        id: i64,
    ) -> Result<Option<Subject>, DatabaseError> {
        let row = sqlx::query_as::<_, Subject>(
            "SELECT id, title, user_id FROM subjects WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_subject(
        &self,
        owner: i64,
        id: i64,
        title: &str,
    ) -> Result<Option<Subject>, DatabaseError> {
        let row = sqlx::query_as::<_, Subject>(
            "UPDATE subjects SET title = $3 WHERE id = $1 AND user_id = $2 RETURNING id, title, user_id",
        )
        .bind(id)
        .bind(owner)
        .bind(title)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_subject(&self, owner: i64, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM subjects WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_note(
        &self,
        owner: i64,
        note: &NoteInput,
    ) -> Result<Option<Note>, DatabaseError> {
        // The SELECT yields no row unless the subject belongs to the owner,
        // in which case nothing is inserted.
        let query = format!(
            "INSERT INTO notes AS n (title, content, subject_id) \
             SELECT $1, $2, s.id FROM subjects s WHERE s.id = $3 AND s.user_id = $4 \
             RETURNING {}",
            NOTE_COLUMNS
        );
        let row = sqlx::query_as::<_, Note>(&query)
            .bind(&note.title)
            .bind(&note.content)
            .bind(note.subject_id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn notes_for_owner(&self, owner: i64) -> Result<Vec<Note>, DatabaseError> {
        let query = format!(
            "SELECT {} FROM notes n JOIN subjects s ON s.id = n.subject_id \
             WHERE s.user_id = $1 ORDER BY n.id",
            NOTE_COLUMNS
        );
        let rows = sqlx::query_as::<_, Note>(&query)
            .bind(owner)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn note_for_owner(&self, owner: i64, id: i64) -> Result<Option<Note>, DatabaseError> {
        let query = format!(
            "SELECT {} FROM notes n JOIN subjects s ON s.id = n.subject_id \
             WHERE n.id = $1 AND s.user_id = $2",
            NOTE_COLUMNS
        );
        let row = sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_note(
        &self,
        owner: i64,
        id: i64,
        note: &NoteInput,
    ) -> Result<NoteUpdate, DatabaseError> {
        // Dropping the transaction without commit rolls it back.
        let mut tx = self.pool.begin().await?;

        let current: Option<i64> = sqlx::query_scalar(
            "SELECT n.id FROM notes n JOIN subjects s ON s.id = n.subject_id \
             WHERE n.id = $1 AND s.user_id = $2 FOR UPDATE OF n",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&mut *tx)
        .await?;
        if current.is_none() {
            return Ok(NoteUpdate::NoteMissing);
        }

        let target: Option<i64> =
            sqlx::query_scalar("SELECT id FROM subjects WHERE id = $1 AND user_id = $2")
                .bind(note.subject_id)
                .bind(owner)
                .fetch_optional(&mut *tx)
                .await?;
        if target.is_none() {
            return Ok(NoteUpdate::SubjectMissing);
        }

        let query = format!(
            "UPDATE notes AS n SET title = $2, content = $3, subject_id = $4 WHERE n.id = $1 RETURNING {}",
            NOTE_COLUMNS
        );
        let updated = sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .bind(&note.title)
            .bind(&note.content)
            .bind(note.subject_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(NoteUpdate::Updated(updated))
    }

    async fn delete_note(&self, owner: i64, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "DELETE FROM notes n USING subjects s \
             WHERE n.id = $1 AND n.subject_id = s.id AND s.user_id = $2",
        )
        .bind(id)
        .bind(owner)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
