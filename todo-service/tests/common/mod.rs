use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::Authenticator;
use auth::HashingParams;
use auth::PasswordHasher;
use chrono::Duration;
use chrono::Utc;
use serde_json::json;
use serde_json::Value;
use todo_service::domain::todo::errors::TodoError;
use todo_service::domain::todo::models::CreateTodoItemCommand;
use todo_service::domain::todo::models::CreateTodoNoteCommand;
use todo_service::domain::todo::models::TodoItem;
use todo_service::domain::todo::models::TodoItemId;
use todo_service::domain::todo::models::TodoNote;
use todo_service::domain::todo::models::UpdateTodoItemCommand;
use todo_service::domain::todo::ports::TodoRepository;
use todo_service::domain::todo::service::TodoService;
use todo_service::domain::user::errors::UserError;
use todo_service::domain::user::models::EmailAddress;
use todo_service::domain::user::models::NewUser;
use todo_service::domain::user::models::User;
use todo_service::domain::user::models::UserId;
use todo_service::domain::user::ports::UserRepository;
use todo_service::domain::user::service::AuthService;
use todo_service::inbound::http::router::create_router;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server over in-memory stores
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub authenticator: Arc<Authenticator>,
    pub users: Arc<InMemoryUserRepository>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        // Cheap Argon2 parameters keep the suite fast
        let password_hasher = PasswordHasher::with_params(HashingParams {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .expect("Failed to build password hasher");
        let authenticator = Arc::new(
            Authenticator::new(JWT_SECRET, Duration::hours(24))
                .expect("Failed to build authenticator")
                .with_password_hasher(password_hasher),
        );

        let users = Arc::new(InMemoryUserRepository::default());
        let todos = Arc::new(InMemoryTodoRepository::default());

        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&users),
            Arc::clone(&authenticator),
        ));
        let todo_service = Arc::new(TodoService::new(todos));

        let router = create_router(auth_service, todo_service, Arc::clone(&authenticator));

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            authenticator,
            users,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(&format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(&format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Register a user and return the response body
    pub async fn register(&self, email: &str, password: &str, name: &str) -> reqwest::Response {
        self.post("/api/v1/auth/register")
            .json(&json!({
                "email": email,
                "password": password,
                "confirmPassword": password,
                "name": name,
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Register then log in, returning the user ID and bearer token
    pub async fn register_and_login(&self, email: &str, password: &str) -> (i64, String) {
        let response = self.register(email, password, "Test User").await;
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let response = self
            .post("/api/v1/auth/login")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: Value = response.json().await.expect("Failed to parse response");
        (
            body["payload"]["id"].as_i64().expect("Missing user id"),
            body["payload"]["token"]
                .as_str()
                .expect("Missing token")
                .to_string(),
        )
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn count(&self) -> usize {
        self.users.lock().unwrap().len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|existing| existing.email == user.email) {
            return Err(UserError::EmailAlreadyRegistered(
                user.email.as_str().to_string(),
            ));
        }

        let created = User {
            id: UserId(users.len() as i64 + 1),
            email: user.email,
            name: user.name,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        users.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|user| user.id == *id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|user| user.email == *email).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryTodoRepository {
    state: Mutex<TodoState>,
}

#[derive(Default)]
struct TodoState {
    items: Vec<TodoItem>,
    next_item_id: i64,
    next_note_id: i64,
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<TodoItem>, TodoError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .items
            .iter()
            .rev()
            .filter(|item| item.owner == owner)
            .cloned()
            .collect())
    }

    async fn create_item(&self, command: CreateTodoItemCommand) -> Result<TodoItem, TodoError> {
        let mut state = self.state.lock().unwrap();
        state.next_item_id += 1;
        let now = Utc::now();
        let item = TodoItem {
            id: TodoItemId(state.next_item_id),
            owner: command.owner,
            title: command.title,
            description: command.description,
            is_completed: false,
            created_at: now,
            updated_at: now,
            notes: Vec::new(),
        };
        state.items.push(item.clone());
        Ok(item)
    }

    async fn update_item(
        &self,
        command: UpdateTodoItemCommand,
    ) -> Result<Option<TodoItem>, TodoError> {
        let mut state = self.state.lock().unwrap();
        let Some(item) = state
            .items
            .iter_mut()
            .find(|item| item.id == command.id && item.owner == command.owner)
        else {
            return Ok(None);
        };

        item.title = command.title;
        item.description = command.description;
        item.is_completed = command.is_completed;
        item.updated_at = Utc::now();
        Ok(Some(item.clone()))
    }

    async fn delete_item(&self, owner: UserId, id: TodoItemId) -> Result<bool, TodoError> {
        let mut state = self.state.lock().unwrap();
        let before = state.items.len();
        state
            .items
            .retain(|item| !(item.id == id && item.owner == owner));
        Ok(state.items.len() < before)
    }

    async fn create_note(
        &self,
        command: CreateTodoNoteCommand,
    ) -> Result<Option<TodoNote>, TodoError> {
        let mut state = self.state.lock().unwrap();
        state.next_note_id += 1;
        let note_id = state.next_note_id;

        let Some(item) = state
            .items
            .iter_mut()
            .find(|item| item.id == command.todo_item_id && item.owner == command.owner)
        else {
            return Ok(None);
        };

        let now = Utc::now();
        let note = TodoNote {
            id: note_id,
            todo_item_id: item.id,
            note: command.note,
            created_at: now,
            updated_at: now,
        };
        item.notes.push(note.clone());
        Ok(Some(note))
    }
}
