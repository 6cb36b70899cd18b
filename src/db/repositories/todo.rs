//! Todo repository
//!
//! Plain parameterized CRUD for todo items. Every query takes the owning
//! user's ID so one user can never read or modify another user's rows.

use crate::models::Todo;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Todo repository trait
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Insert a new todo and return it with its assigned ID
    async fn create(&self, todo: &Todo) -> Result<Todo>;

    /// List todos for a user, newest first
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Todo>>;

    /// Get a todo by ID, scoped to the owning user
    async fn get(&self, user_id: i64, id: i64) -> Result<Option<Todo>>;

    /// Update a todo, scoped to the owning user; reports whether a row matched
    async fn update(&self, todo: &Todo) -> Result<bool>;

    /// Delete a todo, scoped to the owning user; reports whether a row matched
    async fn delete(&self, user_id: i64, id: i64) -> Result<bool>;
}

/// SQLx-based todo repository implementation
pub struct SqlxTodoRepository {
    pool: SqlitePool,
}

impl SqlxTodoRepository {
    /// Create a new SQLx todo repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn TodoRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl TodoRepository for SqlxTodoRepository {
    async fn create(&self, todo: &Todo) -> Result<Todo> {
        let result = sqlx::query(
            r#"
            INSERT INTO todos (user_id, title, content, completed, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(todo.user_id)
        .bind(&todo.title)
        .bind(&todo.content)
        .bind(todo.completed)
        .bind(todo.created_at)
        .execute(&self.pool)
        .await
        .context("Failed to create todo")?;

        let mut created = todo.clone();
        created.id = result.last_insert_rowid();
        Ok(created)
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Todo>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, title, content, completed, created_at
            FROM todos
            WHERE user_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list todos")?;

        rows.iter().map(row_to_todo).collect()
    }

    async fn get(&self, user_id: i64, id: i64) -> Result<Option<Todo>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, title, content, completed, created_at
            FROM todos
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get todo")?;

        row.as_ref().map(row_to_todo).transpose()
    }

    async fn update(&self, todo: &Todo) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE todos
            SET title = ?, content = ?, completed = ?
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(&todo.title)
        .bind(&todo.content)
        .bind(todo.completed)
        .bind(todo.id)
        .bind(todo.user_id)
        .execute(&self.pool)
        .await
        .context("Failed to update todo")?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, user_id: i64, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .context("Failed to delete todo")?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_todo(row: &sqlx::sqlite::SqliteRow) -> Result<Todo> {
    Ok(Todo {
        id: row.get("id"),
        user_id: row.get("user_id"),
        title: row.get("title"),
        content: row.get("content"),
        completed: row.get("completed"),
        created_at: row.get("created_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};
    use chrono::Utc;

    async fn setup() -> (SqlitePool, SqlxTodoRepository, i64) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let result = sqlx::query(
            "INSERT INTO users (username, email, password_hash, created_at) VALUES ('alice', 'a@x.com', 'hash', ?)",
        )
        .bind(Utc::now())
        .execute(&pool)
        .await
        .expect("Failed to create test user");

        let repo = SqlxTodoRepository::new(pool.clone());
        (pool, repo, result.last_insert_rowid())
    }

    fn test_todo(user_id: i64, title: &str) -> Todo {
        Todo {
            id: 0,
            user_id,
            title: title.to_string(),
            content: String::new(),
            completed: false,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let (_pool, repo, user_id) = setup().await;

        repo.create(&test_todo(user_id, "first"))
            .await
            .expect("Failed to create todo");
        repo.create(&test_todo(user_id, "second"))
            .await
            .expect("Failed to create todo");

        let todos = repo.list_by_user(user_id).await.expect("Failed to list");
        assert_eq!(todos.len(), 2);
        // Newest first
        assert_eq!(todos[0].title, "second");
    }

    #[tokio::test]
    async fn test_get_scoped_to_owner() {
        let (pool, repo, user_id) = setup().await;
        let created = repo
            .create(&test_todo(user_id, "mine"))
            .await
            .expect("Failed to create todo");

        let other = sqlx::query(
            "INSERT INTO users (username, email, password_hash, created_at) VALUES ('bob', 'b@x.com', 'hash', ?)",
        )
        .bind(Utc::now())
        .execute(&pool)
        .await
        .expect("Failed to create second user")
        .last_insert_rowid();

        assert!(repo.get(user_id, created.id).await.unwrap().is_some());
        assert!(repo.get(other, created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_scoped_to_owner() {
        let (_pool, repo, user_id) = setup().await;
        let mut todo = repo
            .create(&test_todo(user_id, "task"))
            .await
            .expect("Failed to create todo");

        todo.title = "renamed".to_string();
        todo.completed = true;
        assert!(repo.update(&todo).await.expect("Failed to update"));

        let found = repo
            .get(user_id, todo.id)
            .await
            .expect("Failed to get")
            .expect("Todo not found");
        assert_eq!(found.title, "renamed");
        assert!(found.completed);

        // Wrong owner updates nothing
        todo.user_id = user_id + 1;
        assert!(!repo.update(&todo).await.expect("Failed to update"));
    }

    #[tokio::test]
    async fn test_delete_scoped_to_owner() {
        let (_pool, repo, user_id) = setup().await;
        let todo = repo
            .create(&test_todo(user_id, "task"))
            .await
            .expect("Failed to create todo");

        assert!(!repo.delete(user_id + 1, todo.id).await.expect("Failed to delete"));
        assert!(repo.delete(user_id, todo.id).await.expect("Failed to delete"));
        assert!(repo.get(user_id, todo.id).await.unwrap().is_none());
    }
}
