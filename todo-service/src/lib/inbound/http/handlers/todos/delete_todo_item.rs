use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::domain::todo::errors::TodoError;
use crate::domain::todo::models::TodoItemId;
use crate::domain::todo::ports::TodoServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::identity::CallerIdentity;
use crate::inbound::http::router::AppState;

pub async fn delete_todo_item(
    State(state): State<AppState>,
    CallerIdentity(owner): CallerIdentity,
    body: Result<Json<DeleteTodoItemRequest>, JsonRejection>,
) -> Result<ApiSuccess<()>, ApiError> {
    let Json(body) = body?;
    let id = TodoItemId::new(body.id).map_err(TodoError::from)?;

    state
        .todo_service
        .delete_item(owner, id)
        .await
        .map_err(ApiError::from)
        .map(|()| ApiSuccess::new(StatusCode::OK, "Todo item deleted", ()))
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteTodoItemRequest {
    id: i64,
}
