use async_trait::async_trait;

use super::errors::TodoError;
use super::models::CreateTodoItemCommand;
use super::models::CreateTodoNoteCommand;
use super::models::TodoItem;
use super::models::TodoItemId;
use super::models::TodoNote;
use super::models::UpdateTodoItemCommand;
use crate::domain::user::models::UserId;

/// Port for todo operations on behalf of an authenticated caller.
#[async_trait]
pub trait TodoServicePort: Send + Sync + 'static {
    /// List the owner's todo items with their notes, newest first.
    async fn list_items(&self, owner: UserId) -> Result<Vec<TodoItem>, TodoError>;

    /// Create a new, not yet completed, todo item.
    async fn create_item(&self, command: CreateTodoItemCommand) -> Result<TodoItem, TodoError>;

    /// Update an owned todo item.
    ///
    /// # Errors
    /// * `NotFound` - Item does not exist or belongs to another user
    /// * `PersistenceFailure` - Store operation failed
    async fn update_item(&self, command: UpdateTodoItemCommand) -> Result<TodoItem, TodoError>;

    /// Delete an owned todo item and its notes.
    ///
    /// # Errors
    /// * `NotFound` - Item does not exist or belongs to another user
    /// * `PersistenceFailure` - Store operation failed
    async fn delete_item(&self, owner: UserId, id: TodoItemId) -> Result<(), TodoError>;

    /// Attach a note to an owned todo item.
    ///
    /// # Errors
    /// * `NotFound` - Parent item does not exist or belongs to another user
    /// * `PersistenceFailure` - Store operation failed
    async fn create_note(&self, command: CreateTodoNoteCommand) -> Result<TodoNote, TodoError>;
}

/// Persistence operations for todo items and notes.
///
/// Every method filters by owner; a row owned by someone else behaves as if
/// it did not exist.
#[async_trait]
pub trait TodoRepository: Send + Sync + 'static {
    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<TodoItem>, TodoError>;

    async fn create_item(&self, command: CreateTodoItemCommand) -> Result<TodoItem, TodoError>;

    /// # Returns
    /// Updated item, or None when no owned item matched
    async fn update_item(
        &self,
        command: UpdateTodoItemCommand,
    ) -> Result<Option<TodoItem>, TodoError>;

    /// # Returns
    /// Whether an owned item was deleted
    async fn delete_item(&self, owner: UserId, id: TodoItemId) -> Result<bool, TodoError>;

    /// Insert a note only if its parent item is owned by `command.owner`.
    ///
    /// # Returns
    /// Created note, or None when the parent is not owned by the caller
    async fn create_note(
        &self,
        command: CreateTodoNoteCommand,
    ) -> Result<Option<TodoNote>, TodoError>;
}
