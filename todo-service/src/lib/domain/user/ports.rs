use async_trait::async_trait;

use crate::domain::user::models::AuthenticatedSession;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;

/// Port for registration and login.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new user.
    ///
    /// # Arguments
    /// * `command` - Validated email and name plus password and its confirmation
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `PasswordMismatch` - Password and confirmation differ
    /// * `WeakPassword` - Password violates the length policy
    /// * `EmailAlreadyRegistered` - Email is already registered
    /// * `HashingFailure` - Password hashing failed
    /// * `PersistenceFailure` - Store operation failed
    async fn register(&self, command: RegisterCommand) -> Result<User, UserError>;

    /// Verify credentials and issue a bearer token.
    ///
    /// # Arguments
    /// * `command` - Raw email and password
    ///
    /// # Returns
    /// The authenticated user and a signed token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password (indistinguishable)
    /// * `HashingFailure` - Stored hash could not be checked
    /// * `TokenIssuanceFailure` - Token signing failed
    /// * `PersistenceFailure` - Store operation failed
    async fn login(&self, command: LoginCommand) -> Result<AuthenticatedSession, UserError>;

    /// Retrieve user by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `PersistenceFailure` - Store operation failed
    async fn get_user(&self, id: &UserId) -> Result<User, UserError>;
}

/// Persistence operations for credential records.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new credential record. One row or nothing.
    ///
    /// # Arguments
    /// * `user` - Record to create
    ///
    /// # Returns
    /// Created user entity with its store-assigned ID
    ///
    /// # Errors
    /// * `EmailAlreadyRegistered` - Email is already registered
    /// * `PersistenceFailure` - Store operation failed
    async fn create(&self, user: NewUser) -> Result<User, UserError>;

    /// Retrieve user by identifier.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `PersistenceFailure` - Store operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by email address.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `PersistenceFailure` - Store operation failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;
}
