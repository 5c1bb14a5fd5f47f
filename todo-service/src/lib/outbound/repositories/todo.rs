use std::collections::HashMap;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;

use crate::domain::todo::errors::TodoError;
use crate::domain::todo::models::CreateTodoItemCommand;
use crate::domain::todo::models::CreateTodoNoteCommand;
use crate::domain::todo::models::NoteText;
use crate::domain::todo::models::TodoDescription;
use crate::domain::todo::models::TodoItem;
use crate::domain::todo::models::TodoItemId;
use crate::domain::todo::models::TodoNote;
use crate::domain::todo::models::TodoTitle;
use crate::domain::todo::models::UpdateTodoItemCommand;
use crate::domain::todo::ports::TodoRepository;
use crate::domain::user::models::UserId;

pub struct PostgresTodoRepository {
    pool: PgPool,
}

impl PostgresTodoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn notes_for(&self, item_ids: &[i64]) -> Result<Vec<TodoNote>, TodoError> {
        if item_ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, TodoNoteRow>(
            r#"
            SELECT id, todo_item_id, note, created_at, updated_at
            FROM todo_notes
            WHERE todo_item_id = ANY($1)
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(item_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(persistence_failure)?
        .into_iter()
        .map(TodoNote::try_from)
        .collect()
    }
}

fn persistence_failure(e: sqlx::Error) -> TodoError {
    TodoError::PersistenceFailure(e.to_string())
}

fn corrupt_row(e: impl ToString) -> TodoError {
    TodoError::PersistenceFailure(format!("corrupt todo row: {}", e.to_string()))
}

#[derive(Debug, FromRow)]
struct TodoItemRow {
    id: i64,
    user_id: i64,
    title: String,
    description: String,
    is_completed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TodoItemRow {
    fn into_item(self, notes: Vec<TodoNote>) -> Result<TodoItem, TodoError> {
        Ok(TodoItem {
            id: TodoItemId::new(self.id).map_err(corrupt_row)?,
            owner: UserId::new(self.user_id).map_err(corrupt_row)?,
            title: TodoTitle::new(self.title).map_err(corrupt_row)?,
            description: TodoDescription::new(self.description).map_err(corrupt_row)?,
            is_completed: self.is_completed,
            created_at: self.created_at,
            updated_at: self.updated_at,
            notes,
        })
    }
}

#[derive(Debug, FromRow)]
struct TodoNoteRow {
    id: i64,
    todo_item_id: i64,
    note: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TodoNoteRow> for TodoNote {
    type Error = TodoError;

    fn try_from(row: TodoNoteRow) -> Result<Self, Self::Error> {
        Ok(TodoNote {
            id: row.id,
            todo_item_id: TodoItemId::new(row.todo_item_id).map_err(corrupt_row)?,
            note: NoteText::new(row.note).map_err(corrupt_row)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl TodoRepository for PostgresTodoRepository {
    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<TodoItem>, TodoError> {
        let rows = sqlx::query_as::<_, TodoItemRow>(
            r#"
            SELECT id, user_id, title, description, is_completed, created_at, updated_at
            FROM todo_items
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(owner.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(persistence_failure)?;

        let item_ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        let mut notes_by_item: HashMap<TodoItemId, Vec<TodoNote>> = HashMap::new();
        for note in self.notes_for(&item_ids).await? {
            notes_by_item.entry(note.todo_item_id).or_default().push(note);
        }

        rows.into_iter()
            .map(|row| {
                let notes = notes_by_item.remove(&TodoItemId(row.id)).unwrap_or_default();
                row.into_item(notes)
            })
            .collect()
    }

    async fn create_item(&self, command: CreateTodoItemCommand) -> Result<TodoItem, TodoError> {
        sqlx::query_as::<_, TodoItemRow>(
            r#"
            INSERT INTO todo_items (user_id, title, description)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, title, description, is_completed, created_at, updated_at
            "#,
        )
        .bind(command.owner.as_i64())
        .bind(command.title.as_str())
        .bind(command.description.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(persistence_failure)?
        .into_item(Vec::new())
    }

    async fn update_item(
        &self,
        command: UpdateTodoItemCommand,
    ) -> Result<Option<TodoItem>, TodoError> {
        let row = sqlx::query_as::<_, TodoItemRow>(
            r#"
            UPDATE todo_items
            SET title = $1, description = $2, is_completed = $3, updated_at = NOW()
            WHERE id = $4 AND user_id = $5
            RETURNING id, user_id, title, description, is_completed, created_at, updated_at
            "#,
        )
        .bind(command.title.as_str())
        .bind(command.description.as_str())
        .bind(command.is_completed)
        .bind(command.id.as_i64())
        .bind(command.owner.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(persistence_failure)?;

        match row {
            Some(row) => {
                let notes = self.notes_for(&[row.id]).await?;
                row.into_item(notes).map(Some)
            }
            None => Ok(None),
        }
    }

    async fn delete_item(&self, owner: UserId, id: TodoItemId) -> Result<bool, TodoError> {
        let result = sqlx::query(
            r#"
            DELETE FROM todo_items
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id.as_i64())
        .bind(owner.as_i64())
        .execute(&self.pool)
        .await
        .map_err(persistence_failure)?;

        Ok(result.rows_affected() > 0)
    }

    async fn create_note(
        &self,
        command: CreateTodoNoteCommand,
    ) -> Result<Option<TodoNote>, TodoError> {
        // Ownership check and insert in one statement
        let row = sqlx::query_as::<_, TodoNoteRow>(
            r#"
            INSERT INTO todo_notes (todo_item_id, note)
            SELECT id, $2
            FROM todo_items
            WHERE id = $1 AND user_id = $3
            RETURNING id, todo_item_id, note, created_at, updated_at
            "#,
        )
        .bind(command.todo_item_id.as_i64())
        .bind(command.note.as_str())
        .bind(command.owner.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(persistence_failure)?;

        row.map(TodoNote::try_from).transpose()
    }
}
