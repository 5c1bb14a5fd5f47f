use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::TodoItemData;
use crate::domain::todo::errors::TodoError;
use crate::domain::todo::models::TodoDescription;
use crate::domain::todo::models::TodoItemId;
use crate::domain::todo::models::TodoTitle;
use crate::domain::todo::models::UpdateTodoItemCommand;
use crate::domain::todo::ports::TodoServicePort;
use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::identity::CallerIdentity;
use crate::inbound::http::router::AppState;

pub async fn update_todo_item(
    State(state): State<AppState>,
    CallerIdentity(owner): CallerIdentity,
    body: Result<Json<UpdateTodoItemRequest>, JsonRejection>,
) -> Result<ApiSuccess<TodoItemData>, ApiError> {
    let Json(body) = body?;

    state
        .todo_service
        .update_item(body.try_into_command(owner)?)
        .await
        .map_err(ApiError::from)
        .map(|ref item| ApiSuccess::new(StatusCode::OK, "Todo item updated", item.into()))
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodoItemRequest {
    id: i64,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    is_completed: bool,
}

impl UpdateTodoItemRequest {
    fn try_into_command(self, owner: UserId) -> Result<UpdateTodoItemCommand, TodoError> {
        Ok(UpdateTodoItemCommand {
            id: TodoItemId::new(self.id)?,
            owner,
            title: TodoTitle::new(self.title)?,
            description: TodoDescription::new(self.description)?,
            is_completed: self.is_completed,
        })
    }
}
