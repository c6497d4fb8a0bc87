//! User store

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::{debug, error};

use super::models::{NewUser, User};
use crate::common::safe_email_log;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("{0}")]
    UserNotFound(String),

    #[error("user already exists: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Storage operations the authentication layer needs from the user store.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_user_by_id(&self, id: i64) -> Result<User, RepositoryError>;
    async fn get_user_by_email(&self, email: &str) -> Result<User, RepositoryError>;
    /// Reports [`RepositoryError::Conflict`] when the email is already taken.
    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError>;
}

#[derive(Debug, Clone)]
pub struct SqliteUserRepository {
    db: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn get_user_by_id(&self, id: i64) -> Result<User, RepositoryError> {
        sqlx::query_as::<_, User>("SELECT id, email, name, picture FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| RepositoryError::UserNotFound(format!("user with id {} not found", id)))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, RepositoryError> {
        sqlx::query_as::<_, User>("SELECT id, email, name, picture FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| {
                RepositoryError::UserNotFound(format!(
                    "user with email {} not found",
                    safe_email_log(email)
                ))
            })
    }

    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, name, picture)
            VALUES (?, ?, ?)
            RETURNING id, email, name, picture
            "#,
        )
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.picture)
        .fetch_one(&self.db)
        .await;

        match result {
            Ok(created) => {
                debug!(user_id = created.id, "Inserted new user");
                Ok(created)
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                debug!(
                    email = %safe_email_log(&user.email),
                    "Insert hit unique email constraint"
                );
                Err(RepositoryError::Conflict(safe_email_log(&user.email)))
            }
            Err(e) => {
                error!(
                    error = %e,
                    email = %safe_email_log(&user.email),
                    "Database error inserting new user"
                );
                Err(RepositoryError::DatabaseError(e))
            }
        }
    }
}
