//! Todo model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A todo item owned by a single user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Todo {
    /// Unique identifier
    pub id: i64,
    /// Owning user ID
    pub user_id: i64,
    /// Title
    pub title: String,
    /// Body text
    pub content: String,
    /// Completion flag
    pub completed: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Input for creating a todo
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTodoInput {
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// Input for updating a todo
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTodoInput {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub completed: bool,
}
