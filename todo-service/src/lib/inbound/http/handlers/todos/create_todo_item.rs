use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::TodoItemData;
use crate::domain::todo::errors::TodoError;
use crate::domain::todo::models::CreateTodoItemCommand;
use crate::domain::todo::models::TodoDescription;
use crate::domain::todo::models::TodoTitle;
use crate::domain::todo::ports::TodoServicePort;
use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::identity::CallerIdentity;
use crate::inbound::http::router::AppState;

pub async fn create_todo_item(
    State(state): State<AppState>,
    CallerIdentity(owner): CallerIdentity,
    body: Result<Json<CreateTodoItemRequest>, JsonRejection>,
) -> Result<ApiSuccess<TodoItemData>, ApiError> {
    let Json(body) = body?;

    state
        .todo_service
        .create_item(body.try_into_command(owner)?)
        .await
        .map_err(ApiError::from)
        .map(|ref item| ApiSuccess::new(StatusCode::CREATED, "Todo item created", item.into()))
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTodoItemRequest {
    title: String,
    #[serde(default)]
    description: String,
}

impl CreateTodoItemRequest {
    fn try_into_command(self, owner: UserId) -> Result<CreateTodoItemCommand, TodoError> {
        Ok(CreateTodoItemCommand {
            owner,
            title: TodoTitle::new(self.title)?,
            description: TodoDescription::new(self.description)?,
        })
    }
}
