use axum::extract::State;
use axum::http::StatusCode;

use super::register::UserData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::ports::AuthServicePort;
use crate::inbound::http::identity::CallerIdentity;
use crate::inbound::http::router::AppState;

pub async fn current_user(
    State(state): State<AppState>,
    CallerIdentity(user_id): CallerIdentity,
) -> Result<ApiSuccess<UserData>, ApiError> {
    state
        .auth_service
        .get_user(&user_id)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, "Current user", user.into()))
}
