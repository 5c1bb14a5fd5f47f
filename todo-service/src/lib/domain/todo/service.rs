use std::sync::Arc;

use async_trait::async_trait;

use super::errors::TodoError;
use super::models::CreateTodoItemCommand;
use super::models::CreateTodoNoteCommand;
use super::models::TodoItem;
use super::models::TodoItemId;
use super::models::TodoNote;
use super::models::UpdateTodoItemCommand;
use super::ports::TodoRepository;
use super::ports::TodoServicePort;
use crate::domain::user::models::UserId;

/// Concrete implementation of TodoServicePort.
///
/// Generic over repository for testability.
pub struct TodoService<TR>
where
    TR: TodoRepository,
{
    repository: Arc<TR>,
}

impl<TR> TodoService<TR>
where
    TR: TodoRepository,
{
    pub fn new(repository: Arc<TR>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<TR> TodoServicePort for TodoService<TR>
where
    TR: TodoRepository,
{
    async fn list_items(&self, owner: UserId) -> Result<Vec<TodoItem>, TodoError> {
        self.repository.list_by_owner(owner).await
    }

    async fn create_item(&self, command: CreateTodoItemCommand) -> Result<TodoItem, TodoError> {
        let item = self.repository.create_item(command).await?;
        tracing::debug!(todo_item_id = %item.id, owner = %item.owner, "Todo item created");
        Ok(item)
    }

    async fn update_item(&self, command: UpdateTodoItemCommand) -> Result<TodoItem, TodoError> {
        let id = command.id;
        self.repository
            .update_item(command)
            .await?
            .ok_or(TodoError::NotFound(id.to_string()))
    }

    async fn delete_item(&self, owner: UserId, id: TodoItemId) -> Result<(), TodoError> {
        if self.repository.delete_item(owner, id).await? {
            tracing::debug!(todo_item_id = %id, owner = %owner, "Todo item deleted");
            Ok(())
        } else {
            Err(TodoError::NotFound(id.to_string()))
        }
    }

    async fn create_note(&self, command: CreateTodoNoteCommand) -> Result<TodoNote, TodoError> {
        let todo_item_id = command.todo_item_id;
        self.repository
            .create_note(command)
            .await?
            .ok_or(TodoError::NotFound(todo_item_id.to_string()))
    }
}
