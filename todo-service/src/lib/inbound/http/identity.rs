use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::extract::Request;
use axum::http::request::Parts;
use axum::http::Extensions;
use thiserror::Error;

use super::handlers::ApiError;
use crate::domain::user::models::UserId;

/// Identity of the caller, attached to a request by the auth gate.
///
/// Lives in the request's extensions and is dropped with the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerIdentity(pub UserId);

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("No caller identity attached to request")]
    IdentityMissing,
}

/// Return `request` with `user_id` attached as its caller identity.
pub fn with_identity(mut request: Request, user_id: UserId) -> Request {
    request.extensions_mut().insert(CallerIdentity(user_id));
    request
}

/// Read the caller identity attached by [`with_identity`].
pub fn identity_of(extensions: &Extensions) -> Result<UserId, IdentityError> {
    extensions
        .get::<CallerIdentity>()
        .map(|identity| identity.0)
        .ok_or(IdentityError::IdentityMissing)
}

#[async_trait]
impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = identity_of(&parts.extensions)?;
        tracing::trace!(user_id = %user_id, "Caller identity extracted");
        Ok(CallerIdentity(user_id))
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct RequestTag(&'static str);

    #[test]
    fn test_attach_and_read_identity() {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();

        let request = with_identity(request, UserId(42));

        assert_eq!(identity_of(request.extensions()), Ok(UserId(42)));
    }

    #[test]
    fn test_missing_identity() {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();

        assert_eq!(
            identity_of(request.extensions()),
            Err(IdentityError::IdentityMissing)
        );
    }

    #[test]
    fn test_existing_extensions_are_preserved() {
        let mut request = Request::builder().uri("/").body(Body::empty()).unwrap();
        request.extensions_mut().insert(RequestTag("trace-7"));

        let request = with_identity(request, UserId(3));

        assert_eq!(
            request.extensions().get::<RequestTag>(),
            Some(&RequestTag("trace-7"))
        );
        assert_eq!(identity_of(request.extensions()), Ok(UserId(3)));
    }

    #[test]
    fn test_requests_do_not_share_identity() {
        let first = with_identity(
            Request::builder().uri("/").body(Body::empty()).unwrap(),
            UserId(1),
        );
        let second = Request::builder().uri("/").body(Body::empty()).unwrap();

        assert_eq!(identity_of(first.extensions()), Ok(UserId(1)));
        assert_eq!(
            identity_of(second.extensions()),
            Err(IdentityError::IdentityMissing)
        );
    }

    #[tokio::test]
    async fn test_extractor_without_identity_fails_internally() {
        let (mut parts, _) = Request::builder()
            .uri("/")
            .body(Body::empty())
            .unwrap()
            .into_parts();

        let result = CallerIdentity::from_request_parts(&mut parts, &()).await;

        assert_eq!(
            result,
            Err(ApiError::InternalServerError(
                "Internal server error".to_string()
            ))
        );
    }
}
