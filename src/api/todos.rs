//! Todo endpoints
//!
//! All routes here sit behind the auth middleware; the handlers work with the
//! user the gate resolved and never see anyone else's rows.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::api::responses::ApiResponse;
use crate::models::{CreateTodoInput, Todo, UpdateTodoInput};

/// GET /api/todos
pub async fn list(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<ApiResponse<Vec<Todo>>>, ApiError> {
    let todos = state.todo_service.list(user.id).await?;
    Ok(Json(ApiResponse::success("Todos retrieved", todos)))
}

/// POST /api/todos
pub async fn create(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(input): Json<CreateTodoInput>,
) -> Result<Json<ApiResponse<Todo>>, ApiError> {
    let todo = state.todo_service.create(user.id, input).await?;
    Ok(Json(ApiResponse::success("Todo created", todo)))
}

/// PUT /api/todos/{id}
pub async fn update(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i64>,
    Json(input): Json<UpdateTodoInput>,
) -> Result<Json<ApiResponse<Todo>>, ApiError> {
    let todo = state.todo_service.update(user.id, id, input).await?;
    Ok(Json(ApiResponse::success("Todo updated", todo)))
}

/// DELETE /api/todos/{id}
pub async fn remove(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.todo_service.delete(user.id, id).await?;
    Ok(Json(ApiResponse::success_empty("Todo deleted")))
}
