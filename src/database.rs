//! SQLite pool construction and schema bootstrap.

use std::str::FromStr as _;

use anyhow::{Context as _, Result};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
};
use sqlx::SqlitePool;

use crate::settings;

/// Open (creating if missing) the database and make sure the schema exists.
pub async fn connect(settings: &settings::Database) -> Result<SqlitePool> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite://{}?mode=rwc", settings.path))?
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(opts)
        .await
        .with_context(|| format!("failed to open database at {}", settings.path))?;

    init_schema(&pool).await?;
    Ok(pool)
}

/// Create the application tables if they are absent. Idempotent.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            username      TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            created_at    TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await
    .context("failed to create users table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS todos (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            title      TEXT NOT NULL,
            date       TEXT NOT NULL,
            content    TEXT NOT NULL,
            owner_id   INTEGER NOT NULL REFERENCES users(id),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await
    .context("failed to create todos table")?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_todos_owner_date ON todos (owner_id, date)")
        .execute(pool)
        .await
        .context("failed to create todos index")?;

    Ok(())
}

#[cfg(test)]
pub(crate) async fn memory_pool() -> SqlitePool {
    let opts = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    // One connection only: every pooled connection would otherwise get its
    // own private in-memory database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(opts)
        .await
        .unwrap();
    init_schema(&pool).await.unwrap();
    pool
}
