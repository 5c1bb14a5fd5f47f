use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;

use crate::domain::user::models::AuthenticatedSession;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::HashedPassword;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::PasswordPolicy;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::AuthServicePort;
use crate::user::ports::UserRepository;

/// Domain service implementation for registration and login.
///
/// Concrete implementation of AuthServicePort with dependency injection.
/// Argon2 work runs on the blocking pool; nothing is written before hashing
/// has finished, so a dropped request leaves the store untouched.
pub struct AuthService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
    dummy_hash: Option<Arc<str>>,
}

/// Verified against when a login names no known account, so that branch pays
/// the same Argon2 cost as a wrong password.
const DUMMY_PASSWORD: &str = "dummy-password-for-unknown-accounts";

impl<UR> AuthService<UR>
where
    UR: UserRepository,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Credential record store
    /// * `authenticator` - Password hasher and token codec
    ///
    /// # Returns
    /// Configured auth service instance
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        // Hashed with the configured parameters so its verify cost matches
        // a real record.
        let dummy_hash = match authenticator.hash_password(DUMMY_PASSWORD) {
            Ok(hash) => Some(Arc::from(hash)),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to prepare dummy password hash");
                None
            }
        };

        Self {
            repository,
            authenticator,
            dummy_hash,
        }
    }

    async fn verify_against_dummy(&self, password: String) {
        let Some(dummy_hash) = self.dummy_hash.clone() else {
            return;
        };
        let authenticator = Arc::clone(&self.authenticator);

        let _ = tokio::task::spawn_blocking(move || {
            authenticator.verify_password(&password, &dummy_hash)
        })
        .await;
    }
}

#[async_trait]
impl<UR> AuthServicePort for AuthService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<User, UserError> {
        if command.password != command.confirm_password {
            return Err(UserError::PasswordMismatch);
        }
        PasswordPolicy::check(&command.password)?;

        let authenticator = Arc::clone(&self.authenticator);
        let password = command.password;
        let password_hash =
            tokio::task::spawn_blocking(move || authenticator.hash_password(&password))
                .await
                .map_err(|e| UserError::HashingFailure(format!("hashing task failed: {}", e)))?
                .map_err(|e| UserError::HashingFailure(e.to_string()))?;

        let user = self
            .repository
            .create(NewUser {
                email: command.email,
                name: command.name,
                password_hash: HashedPassword::new(password_hash),
            })
            .await?;

        tracing::info!(user_id = %user.id, "User registered");

        Ok(user)
    }

    async fn login(&self, command: LoginCommand) -> Result<AuthenticatedSession, UserError> {
        let password = command.password;

        let email = match EmailAddress::new(command.email) {
            Ok(email) => email,
            Err(_) => {
                self.verify_against_dummy(password).await;
                return Err(UserError::InvalidCredentials);
            }
        };

        let user = match self.repository.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                tracing::debug!(email = %email, "Login for unknown email");
                self.verify_against_dummy(password).await;
                return Err(UserError::InvalidCredentials);
            }
        };

        let authenticator = Arc::clone(&self.authenticator);
        let stored_hash = user.password_hash.clone();
        let subject = user.id;

        let result = tokio::task::spawn_blocking(move || {
            authenticator.authenticate(&password, stored_hash.as_str(), subject)
        })
        .await
        .map_err(|e| UserError::HashingFailure(format!("verification task failed: {}", e)))?
        .map_err(|e| match e {
            AuthenticationError::InvalidCredentials => {
                tracing::debug!(user_id = %subject, "Login with wrong password");
                UserError::InvalidCredentials
            }
            AuthenticationError::PasswordError(err) => {
                tracing::error!(
                    user_id = %subject,
                    error = %err,
                    "Stored password hash could not be verified"
                );
                UserError::HashingFailure(err.to_string())
            }
            AuthenticationError::JwtError(err) => UserError::TokenIssuanceFailure(err.to_string()),
        })?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(AuthenticatedSession {
            user,
            token: result.access_token,
        })
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }
}
