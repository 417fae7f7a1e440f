pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;

use std::sync::Arc;
use thiserror::Error;

use crate::config::DatabaseConfig;

pub use manager::DatabaseManager;
pub use memory::MemoryStore;
pub use models::{NewUser, Note, NoteInput, Subject, User};
pub use postgres::PgStore;
pub use store::{NoteUpdate, Store};

pub const USERNAME_TAKEN: &str = "Username already exist";
pub const EMAIL_TAKEN: &str = "Email Already register";
pub const SUBJECT_TAKEN: &str = "Subject already exist";

/// Errors from the persistence layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        let unique = match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Some(unique_violation_message(db.constraint()))
            }
            _ => None,
        };
        if let Some(message) = unique {
            return DatabaseError::UniqueViolation(message.to_string());
        }

        if matches!(
            err,
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)
        ) {
            return DatabaseError::Connection(err.to_string());
        }

        DatabaseError::Sqlx(err)
    }
}

/// Client-facing message for a violated unique constraint, keyed by the
/// constraint names in the migrations.
fn unique_violation_message(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some("users_username_key") => USERNAME_TAKEN,
        Some("users_email_key") => EMAIL_TAKEN,
        Some("subjects_title_key") => SUBJECT_TAKEN,
        _ => "Resource already exists",
    }
}

/// Open the store named by `DATABASE_URL`. `memory://` selects the
/// in-process store; anything else is treated as a Postgres URL.
pub async fn open_store(config: &DatabaseConfig) -> Result<Arc<dyn Store>, DatabaseError> {
    if config.url.starts_with("memory:") {
        tracing::warn!("Using in-memory store, data will not survive a restart");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let pool = DatabaseManager::connect(config).await?;
    DatabaseManager::migrate(&pool).await?;
    Ok(Arc::new(PgStore::new(pool)))
}
