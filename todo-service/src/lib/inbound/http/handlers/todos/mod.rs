use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::domain::todo::models::TodoItem;
use crate::domain::todo::models::TodoNote;

pub mod create_todo_item;
pub mod create_todo_note;
pub mod delete_todo_item;
pub mod list_todo_items;
pub mod update_todo_item;

pub use create_todo_item::create_todo_item;
pub use create_todo_note::create_todo_note;
pub use delete_todo_item::delete_todo_item;
pub use list_todo_items::list_todo_items;
pub use update_todo_item::update_todo_item;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItemData {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub notes: Vec<TodoNoteData>,
}

impl From<&TodoItem> for TodoItemData {
    fn from(item: &TodoItem) -> Self {
        Self {
            id: item.id.as_i64(),
            title: item.title.as_str().to_string(),
            description: item.description.as_str().to_string(),
            is_completed: item.is_completed,
            created_at: item.created_at,
            updated_at: item.updated_at,
            notes: item.notes.iter().map(TodoNoteData::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoNoteData {
    pub id: i64,
    pub todo_item_id: i64,
    pub note: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&TodoNote> for TodoNoteData {
    fn from(note: &TodoNote) -> Self {
        Self {
            id: note.id,
            todo_item_id: note.todo_item_id.as_i64(),
            note: note.note.as_str().to_string(),
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }
}
