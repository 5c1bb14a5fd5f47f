use axum::extract::State;
use axum::http::StatusCode;

use super::TodoItemData;
use crate::domain::todo::ports::TodoServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::identity::CallerIdentity;
use crate::inbound::http::router::AppState;

pub async fn list_todo_items(
    State(state): State<AppState>,
    CallerIdentity(owner): CallerIdentity,
) -> Result<ApiSuccess<Vec<TodoItemData>>, ApiError> {
    state
        .todo_service
        .list_items(owner)
        .await
        .map_err(ApiError::from)
        .map(|items| {
            ApiSuccess::new(
                StatusCode::OK,
                "Todo items retrieved",
                items.iter().map(TodoItemData::from).collect(),
            )
        })
}
