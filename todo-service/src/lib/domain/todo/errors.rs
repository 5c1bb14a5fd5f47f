use thiserror::Error;

/// Error for TodoItemId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TodoItemIdError {
    #[error("Todo item ID must be positive, got {0}")]
    NotPositive(i64),
}

/// Error for TodoTitle validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TodoTitleError {
    #[error("Title too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Title too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for TodoDescription validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TodoDescriptionError {
    #[error("Description too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for NoteText validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NoteTextError {
    #[error("Note must not be empty")]
    Empty,

    #[error("Note too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Top-level error for todo operations
#[derive(Debug, Clone, Error)]
pub enum TodoError {
    #[error("Invalid todo item ID: {0}")]
    InvalidTodoItemId(#[from] TodoItemIdError),

    #[error("Invalid title: {0}")]
    InvalidTitle(#[from] TodoTitleError),

    #[error("Invalid description: {0}")]
    InvalidDescription(#[from] TodoDescriptionError),

    #[error("Invalid note: {0}")]
    InvalidNote(#[from] NoteTextError),

    #[error("Todo item not found: {0}")]
    NotFound(String),

    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),
}
