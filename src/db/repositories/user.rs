//! User repository
//!
//! Database operations for user records. Duplicate usernames and emails are
//! rejected by the table's unique constraints; `create` surfaces the violation
//! to the caller rather than swallowing it.

use crate::models::User;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// User repository trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user and return it with its assigned ID.
    ///
    /// Fails with the underlying unique-constraint violation when the username
    /// or email is already taken.
    async fn create(&self, user: &User) -> Result<User>;

    /// Get user by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<User>>;

    /// Get user by username, including the password hash
    async fn get_by_username(&self, username: &str) -> Result<Option<User>>;
}

/// SQLx-based user repository implementation
pub struct SqlxUserRepository {
    pool: SqlitePool,
}

impl SqlxUserRepository {
    /// Create a new SQLx user repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn UserRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn create(&self, user: &User) -> Result<User> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, email, password_hash, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .context("Failed to create user")?;

        let mut created = user.clone();
        created.id = result.last_insert_rowid();
        Ok(created)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get user by ID")?;

        row.map(|row| row_to_user(&row)).transpose()
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get user by username")?;

        row.map(|row| row_to_user(&row)).transpose()
    }
}

fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> Result<User> {
    Ok(User {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        created_at: row.get("created_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::unique_violation_message;
    use crate::db::{create_test_pool, migrations};

    async fn setup_test_repo() -> SqlxUserRepository {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SqlxUserRepository::new(pool)
    }

    fn test_user(username: &str, email: &str) -> User {
        User::new(username.to_string(), email.to_string(), "hash".to_string())
    }

    #[tokio::test]
    async fn test_create_assigns_id() {
        let repo = setup_test_repo().await;

        let created = repo
            .create(&test_user("alice", "a@x.com"))
            .await
            .expect("Failed to create user");

        assert!(created.id > 0);
        assert_eq!(created.username, "alice");
    }

    #[tokio::test]
    async fn test_get_by_username_includes_hash() {
        let repo = setup_test_repo().await;
        repo.create(&test_user("alice", "a@x.com"))
            .await
            .expect("Failed to create user");

        let found = repo
            .get_by_username("alice")
            .await
            .expect("Failed to query")
            .expect("User not found");

        assert_eq!(found.email, "a@x.com");
        assert_eq!(found.password_hash, "hash");
    }

    #[tokio::test]
    async fn test_get_by_username_not_found() {
        let repo = setup_test_repo().await;
        let found = repo.get_by_username("nobody").await.expect("Failed to query");
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let repo = setup_test_repo().await;
        let created = repo
            .create(&test_user("alice", "a@x.com"))
            .await
            .expect("Failed to create user");

        let found = repo
            .get_by_id(created.id)
            .await
            .expect("Failed to query")
            .expect("User not found");
        assert_eq!(found.username, "alice");
    }

    #[tokio::test]
    async fn test_duplicate_username_is_unique_violation() {
        let repo = setup_test_repo().await;
        repo.create(&test_user("alice", "a@x.com"))
            .await
            .expect("First create should succeed");

        let err = repo
            .create(&test_user("alice", "other@x.com"))
            .await
            .expect_err("Duplicate username should fail");
        let message = unique_violation_message(&err).expect("should be a unique violation");
        assert!(message.contains("username"));
    }

    #[tokio::test]
    async fn test_duplicate_email_is_unique_violation() {
        let repo = setup_test_repo().await;
        repo.create(&test_user("alice", "a@x.com"))
            .await
            .expect("First create should succeed");

        let err = repo
            .create(&test_user("bob", "a@x.com"))
            .await
            .expect_err("Duplicate email should fail");
        let message = unique_violation_message(&err).expect("should be a unique violation");
        assert!(message.contains("email"));
    }
}
