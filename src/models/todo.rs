//! Todo repository: the `todos` table, scoped by owner.
//!
//! `date` is an opaque string; listings order by it lexicographically and
//! never parse it as a calendar date. Ownership is fixed at creation and
//! never transfers.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::{FromRow, SqlitePool};

/// One to-do item.
#[derive(Debug, Clone, FromRow)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub date: String,
    pub content: String,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The three caller-supplied fields, doubling as the add/edit form payload.
/// Empty strings are accepted; only field presence is validated.
#[derive(Debug, Clone, Deserialize)]
pub struct TodoFields {
    pub title: String,
    pub date: String,
    pub content: String,
}

impl Todo {
    /// All todos for one owner, ascending by the raw `date` string.
    pub async fn list_by_owner(
        pool: &SqlitePool,
        owner_id: i64,
    ) -> Result<Vec<Todo>, sqlx::Error> {
        sqlx::query_as(
            "SELECT id, title, date, content, owner_id, created_at, updated_at
             FROM todos WHERE owner_id = ?
             ORDER BY date ASC, id ASC",
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Todo>, sqlx::Error> {
        sqlx::query_as(
            "SELECT id, title, date, content, owner_id, created_at, updated_at
             FROM todos WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn create(
        pool: &SqlitePool,
        owner_id: i64,
        fields: &TodoFields,
    ) -> Result<Todo, sqlx::Error> {
        let now = Utc::now();
        sqlx::query_as(
            "INSERT INTO todos (title, date, content, owner_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING id, title, date, content, owner_id, created_at, updated_at",
        )
        .bind(&fields.title)
        .bind(&fields.date)
        .bind(&fields.content)
        .bind(owner_id)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await
    }

    /// Replace title, date and content unconditionally. Last write wins;
    /// concurrent edits of the same todo are not detected.
    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        fields: &TodoFields,
    ) -> Result<Todo, sqlx::Error> {
        sqlx::query_as(
            "UPDATE todos SET title = ?, date = ?, content = ?, updated_at = ?
             WHERE id = ?
             RETURNING id, title, date, content, owner_id, created_at, updated_at",
        )
        .bind(&fields.title)
        .bind(&fields.date)
        .bind(&fields.content)
        .bind(Utc::now())
        .bind(id)
        .fetch_one(pool)
        .await
    }

    /// Permanent removal.
    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM todos WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}

/// Distinct `date` values in first-seen order, for date-grouped display.
pub fn unique_dates(todos: &[Todo]) -> Vec<String> {
    let mut dates: Vec<String> = Vec::new();
    for todo in todos {
        if !dates.iter().any(|d| d == &todo.date) {
            dates.push(todo.date.clone());
        }
    }
    dates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory_pool;
    use crate::models::User;

    fn fields(title: &str, date: &str, content: &str) -> TodoFields {
        TodoFields {
            title: title.into(),
            date: date.into(),
            content: content.into(),
        }
    }

    async fn owner(pool: &SqlitePool, name: &str) -> i64 {
        User::create(pool, name, "hash").await.unwrap().id
    }

    #[tokio::test]
    async fn listing_sorts_by_date_string() {
        let pool = memory_pool().await;
        let alice = owner(&pool, "alice").await;

        Todo::create(&pool, alice, &fields("later", "2024-01-02", "c")).await.unwrap();
        Todo::create(&pool, alice, &fields("sooner", "2024-01-01", "c")).await.unwrap();

        let todos = Todo::list_by_owner(&pool, alice).await.unwrap();
        let titles: Vec<&str> = todos.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["sooner", "later"]);
    }

    #[tokio::test]
    async fn listing_is_scoped_to_owner() {
        let pool = memory_pool().await;
        let alice = owner(&pool, "alice").await;
        let bob = owner(&pool, "bob").await;

        Todo::create(&pool, alice, &fields("mine", "2024-01-01", "c")).await.unwrap();
        Todo::create(&pool, bob, &fields("theirs", "2024-01-01", "c")).await.unwrap();

        let todos = Todo::list_by_owner(&pool, alice).await.unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].title, "mine");
        assert_eq!(todos[0].owner_id, alice);
    }

    #[tokio::test]
    async fn update_replaces_fields_but_not_owner() {
        let pool = memory_pool().await;
        let alice = owner(&pool, "alice").await;
        let todo = Todo::create(&pool, alice, &fields("before", "2024-01-01", "old"))
            .await
            .unwrap();

        let updated = Todo::update(&pool, todo.id, &fields("after", "2024-02-02", "new"))
            .await
            .unwrap();
        assert_eq!(updated.id, todo.id);
        assert_eq!(updated.title, "after");
        assert_eq!(updated.date, "2024-02-02");
        assert_eq!(updated.content, "new");
        assert_eq!(updated.owner_id, alice);
        assert_eq!(updated.created_at, todo.created_at);
    }

    #[tokio::test]
    async fn delete_is_permanent() {
        let pool = memory_pool().await;
        let alice = owner(&pool, "alice").await;
        let todo = Todo::create(&pool, alice, &fields("gone", "2024-01-01", "c"))
            .await
            .unwrap();

        Todo::delete(&pool, todo.id).await.unwrap();
        assert!(Todo::find_by_id(&pool, todo.id).await.unwrap().is_none());
        assert!(Todo::list_by_owner(&pool, alice).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unique_dates_keeps_first_seen_order() {
        let pool = memory_pool().await;
        let alice = owner(&pool, "alice").await;
        for (title, date) in [
            ("a", "2024-01-01"),
            ("b", "2024-01-01"),
            ("c", "2024-01-02"),
            ("d", "2024-01-03"),
            ("e", "2024-01-02"),
        ] {
            Todo::create(&pool, alice, &fields(title, date, "c")).await.unwrap();
        }

        let todos = Todo::list_by_owner(&pool, alice).await.unwrap();
        let dates = unique_dates(&todos);
        assert_eq!(dates, ["2024-01-01", "2024-01-02", "2024-01-03"]);
    }
}
