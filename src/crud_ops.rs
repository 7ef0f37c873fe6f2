use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Extension, Path,
    },
    http::StatusCode,
    Json,
};

use crate::{
    entities::{CreateTodoRequest, Todo},
    error::ApiError,
    store::TodoStore,
};

pub type DynStore = Arc<dyn TodoStore>;

const LIVENESS_MESSAGE: &str = "Todo App API is running! 🚀";
const TODO_FIELDS_REQUIRED: &str = "Title and userId are required";
const INVALID_ID: &str = "Invalid ID format";

pub async fn health() -> &'static str {
    LIVENESS_MESSAGE
}

pub async fn get_todos(
    Extension(store): Extension<DynStore>,
) -> Result<Json<Vec<Todo>>, ApiError> {
    let todos = store
        .list_todos()
        .await
        .map_err(ApiError::internal("Failed to fetch todos"))?;

    Ok(Json(todos))
}

pub async fn create_todo(
    Extension(store): Extension<DynStore>,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let Json(request) = payload.map_err(|_| ApiError::BadRequest(TODO_FIELDS_REQUIRED))?;
    let new_todo = request
        .validate()
        .ok_or(ApiError::BadRequest(TODO_FIELDS_REQUIRED))?;

    let todo = store
        .create_todo(new_todo)
        .await
        .map_err(ApiError::internal("Failed to create todo"))?;

    tracing::info!(todo_id = todo.id, user_id = %todo.user_id, "todo created");
    Ok((StatusCode::CREATED, Json(todo)))
}

/// Marks the todo as completed. There is no way back to `completed = false`.
pub async fn complete_todo(
    Extension(store): Extension<DynStore>,
    todo_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Todo>, ApiError> {
    let Path(todo_id) = todo_id.map_err(|_| ApiError::BadRequest(INVALID_ID))?;

    let todo = store
        .complete_todo(todo_id)
        .await
        .map_err(ApiError::internal("Failed to update todo"))?
        .ok_or(ApiError::NotFound)?;

    tracing::info!(todo_id, "todo completed");
    Ok(Json(todo))
}

pub async fn delete_todo(
    Extension(store): Extension<DynStore>,
    todo_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Path(todo_id) = todo_id.map_err(|_| ApiError::BadRequest(INVALID_ID))?;

    let deleted = store
        .delete_todo(todo_id)
        .await
        .map_err(ApiError::internal("Failed to delete todo"))?;

    if !deleted {
        return Err(ApiError::NotFound);
    }

    tracing::info!(todo_id, "todo deleted");
    Ok(Json(serde_json::json!({ "message": "Todo deleted successfully" })))
}
