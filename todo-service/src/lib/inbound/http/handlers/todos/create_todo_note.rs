use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::TodoNoteData;
use crate::domain::todo::errors::TodoError;
use crate::domain::todo::models::CreateTodoNoteCommand;
use crate::domain::todo::models::NoteText;
use crate::domain::todo::models::TodoItemId;
use crate::domain::todo::ports::TodoServicePort;
use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::identity::CallerIdentity;
use crate::inbound::http::router::AppState;

pub async fn create_todo_note(
    State(state): State<AppState>,
    CallerIdentity(owner): CallerIdentity,
    body: Result<Json<CreateTodoNoteRequest>, JsonRejection>,
) -> Result<ApiSuccess<TodoNoteData>, ApiError> {
    let Json(body) = body?;

    state
        .todo_service
        .create_note(body.try_into_command(owner)?)
        .await
        .map_err(ApiError::from)
        .map(|ref note| ApiSuccess::new(StatusCode::CREATED, "Todo note created", note.into()))
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoNoteRequest {
    todo_item_id: i64,
    note: String,
}

impl CreateTodoNoteRequest {
    fn try_into_command(self, owner: UserId) -> Result<CreateTodoNoteCommand, TodoError> {
        Ok(CreateTodoNoteCommand {
            owner,
            todo_item_id: TodoItemId::new(self.todo_item_id)?,
            note: NoteText::new(self.note)?,
        })
    }
}
