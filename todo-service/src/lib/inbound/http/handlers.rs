use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::domain::todo::errors::TodoError;
use crate::inbound::http::identity::IdentityError;
use crate::user::errors::UserError;

pub mod current_user;
pub mod login;
pub mod register;
pub mod todos;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, message: &str, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, message, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
}

impl ApiError {
    /// The single rejection every auth gate failure collapses into.
    pub fn unauthorized() -> Self {
        ApiError::Unauthorized("Unauthorized".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection, "Rejected request body");
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::InvalidUserId(_)
            | UserError::InvalidName(_)
            | UserError::InvalidEmail(_)
            | UserError::WeakPassword(_)
            | UserError::PasswordMismatch => ApiError::BadRequest(err.to_string()),
            UserError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            UserError::NotFound(_) => ApiError::NotFound(err.to_string()),
            UserError::EmailAlreadyRegistered(_) => ApiError::Conflict(err.to_string()),
            UserError::HashingFailure(ref detail) => {
                tracing::error!(error = %detail, "Password hashing failed");
                ApiError::InternalServerError("Password hashing failed".to_string())
            }
            UserError::TokenIssuanceFailure(ref detail) => {
                tracing::error!(error = %detail, "Token issuance failed");
                ApiError::InternalServerError("Token issuance failed".to_string())
            }
            UserError::PersistenceFailure(ref detail) => {
                tracing::error!(error = %detail, "User store failure");
                ApiError::InternalServerError("Persistence failure".to_string())
            }
        }
    }
}

impl From<TodoError> for ApiError {
    fn from(err: TodoError) -> Self {
        match err {
            TodoError::InvalidTodoItemId(_)
            | TodoError::InvalidTitle(_)
            | TodoError::InvalidDescription(_)
            | TodoError::InvalidNote(_) => ApiError::BadRequest(err.to_string()),
            TodoError::NotFound(_) => ApiError::NotFound(err.to_string()),
            TodoError::PersistenceFailure(ref detail) => {
                tracing::error!(error = %detail, "Todo store failure");
                ApiError::InternalServerError("Persistence failure".to_string())
            }
        }
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        tracing::error!(error = %err, "Protected handler reached without caller identity");
        ApiError::InternalServerError("Internal server error".to_string())
    }
}

/// Envelope shared by every JSON response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    success: bool,
    status: u16,
    message: String,
    payload: Option<T>,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status: StatusCode, message: &str, payload: T) -> Self {
        Self {
            success: true,
            status: status.as_u16(),
            message: message.to_string(),
            payload: Some(payload),
        }
    }
}

impl ApiResponseBody<()> {
    pub fn new_error(status: StatusCode, message: String) -> Self {
        Self {
            success: false,
            status: status.as_u16(),
            message,
            payload: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;
    use serde_json::json;
    use serde_json::Value;

    use super::*;
    use crate::user::errors::PasswordPolicyError;

    async fn render(error: ApiError) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_error_envelope_shape() {
        let (status, body) = render(ApiError::unauthorized()).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            body,
            json!({
                "success": false,
                "status": 401,
                "message": "Unauthorized",
                "payload": null,
            })
        );
    }

    #[test]
    fn test_user_error_status_mapping() {
        assert!(matches!(
            ApiError::from(UserError::PasswordMismatch),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(
            ApiError::from(UserError::WeakPassword(PasswordPolicyError::TooShort {
                min: 8,
                actual: 3
            })),
            ApiError::BadRequest(_)
        ));
        assert_eq!(
            ApiError::from(UserError::InvalidCredentials),
            ApiError::Unauthorized("Invalid email or password".to_string())
        );
        assert!(matches!(
            ApiError::from(UserError::EmailAlreadyRegistered("a@x.com".to_string())),
            ApiError::Conflict(_)
        ));
    }

    #[test]
    fn test_internal_detail_is_not_exposed() {
        let error = ApiError::from(UserError::PersistenceFailure(
            "password authentication failed for user postgres".to_string(),
        ));
        assert_eq!(
            error,
            ApiError::InternalServerError("Persistence failure".to_string())
        );

        let error = ApiError::from(TodoError::PersistenceFailure("pool timed out".to_string()));
        assert_eq!(
            error,
            ApiError::InternalServerError("Persistence failure".to_string())
        );
    }

    #[test]
    fn test_identity_missing_is_internal() {
        assert_eq!(
            ApiError::from(IdentityError::IdentityMissing),
            ApiError::InternalServerError("Internal server error".to_string())
        );
    }
}
