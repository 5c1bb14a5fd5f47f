use std::fmt;

use chrono::DateTime;
use chrono::Utc;

use super::errors::NoteTextError;
use super::errors::TodoDescriptionError;
use super::errors::TodoItemIdError;
use super::errors::TodoTitleError;
use crate::domain::user::models::UserId;

/// Todo item aggregate root.
///
/// Always belongs to exactly one owner; every read and write is scoped to it.
#[derive(Debug, Clone)]
pub struct TodoItem {
    pub id: TodoItemId,
    pub owner: UserId,
    pub title: TodoTitle,
    pub description: TodoDescription,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub notes: Vec<TodoNote>,
}

/// A note attached to a todo item.
#[derive(Debug, Clone)]
pub struct TodoNote {
    pub id: i64,
    pub todo_item_id: TodoItemId,
    pub note: NoteText,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Todo item identifier value object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TodoItemId(pub i64);

impl TodoItemId {
    /// Wrap a client-supplied identifier.
    ///
    /// # Errors
    /// * `NotPositive` - Identifier is zero or negative
    pub fn new(id: i64) -> Result<Self, TodoItemIdError> {
        if id > 0 {
            Ok(Self(id))
        } else {
            Err(TodoItemIdError::NotPositive(id))
        }
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for TodoItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Todo title value object (3 to 255 characters, trimmed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoTitle(String);

impl TodoTitle {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 255;

    pub fn new(title: String) -> Result<Self, TodoTitleError> {
        let title = title.trim().to_string();
        let length = title.chars().count();
        if length < Self::MIN_LENGTH {
            Err(TodoTitleError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(TodoTitleError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(title))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Todo description value object (at most 255 characters, may be empty).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoDescription(String);

impl TodoDescription {
    const MAX_LENGTH: usize = 255;

    pub fn new(description: String) -> Result<Self, TodoDescriptionError> {
        let length = description.chars().count();
        if length > Self::MAX_LENGTH {
            Err(TodoDescriptionError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(description))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Note text value object (non-blank, at most 1000 characters).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteText(String);

impl NoteText {
    const MAX_LENGTH: usize = 1000;

    pub fn new(note: String) -> Result<Self, NoteTextError> {
        let length = note.chars().count();
        if note.trim().is_empty() {
            Err(NoteTextError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(NoteTextError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(note))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Command to create a todo item for the calling user
#[derive(Debug, Clone)]
pub struct CreateTodoItemCommand {
    pub owner: UserId,
    pub title: TodoTitle,
    pub description: TodoDescription,
}

/// Command to replace the editable fields of an owned todo item
#[derive(Debug, Clone)]
pub struct UpdateTodoItemCommand {
    pub id: TodoItemId,
    pub owner: UserId,
    pub title: TodoTitle,
    pub description: TodoDescription,
    pub is_completed: bool,
}

/// Command to attach a note to an owned todo item
#[derive(Debug, Clone)]
pub struct CreateTodoNoteCommand {
    pub owner: UserId,
    pub todo_item_id: TodoItemId,
    pub note: NoteText,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_bounds() {
        assert_eq!(
            TodoTitle::new("  ab  ".to_string()),
            Err(TodoTitleError::TooShort { min: 3, actual: 2 })
        );
        assert_eq!(
            TodoTitle::new(" Buy groceries ".to_string()).unwrap().as_str(),
            "Buy groceries"
        );
        assert!(TodoTitle::new("t".repeat(255)).is_ok());
        assert!(matches!(
            TodoTitle::new("t".repeat(256)),
            Err(TodoTitleError::TooLong { .. })
        ));
    }

    #[test]
    fn test_description_bounds() {
        assert!(TodoDescription::new(String::new()).is_ok());
        assert!(TodoDescription::new("d".repeat(255)).is_ok());
        assert_eq!(
            TodoDescription::new("d".repeat(256)),
            Err(TodoDescriptionError::TooLong {
                max: 255,
                actual: 256
            })
        );
    }

    #[test]
    fn test_note_bounds() {
        assert_eq!(NoteText::new("   ".to_string()), Err(NoteTextError::Empty));
        assert!(NoteText::new("Check dates".to_string()).is_ok());
        assert!(matches!(
            NoteText::new("n".repeat(1001)),
            Err(NoteTextError::TooLong { .. })
        ));
    }

    #[test]
    fn test_todo_item_id_must_be_positive() {
        assert_eq!(TodoItemId::new(3), Ok(TodoItemId(3)));
        assert_eq!(TodoItemId::new(0), Err(TodoItemIdError::NotPositive(0)));
    }
}
