//! Todo service
//!
//! Thin orchestration over the todo repository. All operations take the
//! already-authenticated user's ID; authorization happened at the API gate.

use crate::db::repositories::TodoRepository;
use crate::models::{CreateTodoInput, Todo, UpdateTodoInput};
use anyhow::Context;
use chrono::Utc;
use std::sync::Arc;

/// Error types for todo operations
#[derive(Debug, thiserror::Error)]
pub enum TodoServiceError {
    /// Malformed input
    #[error("Validation error: {0}")]
    Validation(String),

    /// No such todo for this user
    #[error("Todo not found")]
    NotFound,

    /// Underlying persistence failure
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Todo service
pub struct TodoService {
    todo_repo: Arc<dyn TodoRepository>,
}

impl TodoService {
    /// Create a new todo service
    pub fn new(todo_repo: Arc<dyn TodoRepository>) -> Self {
        Self { todo_repo }
    }

    /// Create a todo for a user
    pub async fn create(
        &self,
        user_id: i64,
        input: CreateTodoInput,
    ) -> Result<Todo, TodoServiceError> {
        if input.title.trim().is_empty() {
            return Err(TodoServiceError::Validation(
                "Title cannot be empty".to_string(),
            ));
        }

        let todo = Todo {
            id: 0,
            user_id,
            title: input.title,
            content: input.content,
            completed: false,
            created_at: Utc::now(),
        };

        let created = self
            .todo_repo
            .create(&todo)
            .await
            .context("Failed to create todo")?;
        Ok(created)
    }

    /// List a user's todos, newest first
    pub async fn list(&self, user_id: i64) -> Result<Vec<Todo>, TodoServiceError> {
        let todos = self
            .todo_repo
            .list_by_user(user_id)
            .await
            .context("Failed to list todos")?;
        Ok(todos)
    }

    /// Update one of the user's todos
    pub async fn update(
        &self,
        user_id: i64,
        id: i64,
        input: UpdateTodoInput,
    ) -> Result<Todo, TodoServiceError> {
        if input.title.trim().is_empty() {
            return Err(TodoServiceError::Validation(
                "Title cannot be empty".to_string(),
            ));
        }

        let todo = Todo {
            id,
            user_id,
            title: input.title,
            content: input.content,
            completed: input.completed,
            created_at: Utc::now(), // not written by update
        };

        let matched = self
            .todo_repo
            .update(&todo)
            .await
            .context("Failed to update todo")?;
        if !matched {
            return Err(TodoServiceError::NotFound);
        }

        self.todo_repo
            .get(user_id, id)
            .await
            .context("Failed to reload todo")?
            .ok_or(TodoServiceError::NotFound)
    }

    /// Delete one of the user's todos
    pub async fn delete(&self, user_id: i64, id: i64) -> Result<(), TodoServiceError> {
        let matched = self
            .todo_repo
            .delete(user_id, id)
            .await
            .context("Failed to delete todo")?;
        if !matched {
            return Err(TodoServiceError::NotFound);
        }
        Ok(())
    }
}
