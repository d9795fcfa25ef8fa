//! Credential store: the `users` table.
//!
//! A [`User`] is created once on registration and never updated or deleted.
//! `password_hash` holds an Argon2id PHC string, never a plaintext password.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use thiserror::Error;

/// Database-backed user record.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum CredentialError {
    /// Another user already holds this username.
    #[error("username is already taken")]
    DuplicateUsername,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl User {
    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as("SELECT id, username, password_hash, created_at FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_username(
        pool: &SqlitePool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as(
            "SELECT id, username, password_hash, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(pool)
        .await
    }

    /// Insert a new user. Username uniqueness is enforced by the database
    /// constraint, so concurrent registrations of the same name cannot both
    /// succeed.
    pub async fn create(
        pool: &SqlitePool,
        username: &str,
        password_hash: &str,
    ) -> Result<User, CredentialError> {
        sqlx::query_as(
            "INSERT INTO users (username, password_hash, created_at)
             VALUES (?, ?, ?)
             RETURNING id, username, password_hash, created_at",
        )
        .bind(username)
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_one(pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                CredentialError::DuplicateUsername
            }
            other => CredentialError::Database(other),
        })
    }
}
