use std::sync::Arc;

use auth::Authenticator;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use thiserror::Error;

use super::handlers::ApiError;
use super::identity::with_identity;
use crate::domain::user::models::UserId;

const BEARER_PREFIX: &str = "Bearer ";

/// Why a request was turned away. Only ever logged; the caller always sees
/// the same 401.
#[derive(Debug, Error)]
enum GateRejection {
    #[error("missing credentials")]
    MissingCredentials,

    #[error("malformed authorization header")]
    MalformedHeader,

    #[error("token rejected: {0}")]
    InvalidToken(#[from] auth::JwtError),

    #[error("token subject is not a user ID: {0}")]
    InvalidSubject(String),
}

/// Middleware that validates bearer tokens and attaches the caller identity.
pub async fn authenticate(
    State(authenticator): State<Arc<Authenticator>>,
    request: Request,
    next: Next,
) -> Response {
    let caller = caller_of(&authenticator, request.headers());

    match caller {
        Ok(user_id) => next.run(with_identity(request, user_id)).await,
        Err(rejection) => {
            tracing::warn!(
                reason = %rejection,
                method = %request.method(),
                uri = %request.uri(),
                "Request rejected by auth gate"
            );
            ApiError::unauthorized().into_response()
        }
    }
}

fn caller_of(authenticator: &Authenticator, headers: &HeaderMap) -> Result<UserId, GateRejection> {
    let token = extract_bearer_token(headers)?;

    let claims = authenticator.validate_token(token)?;

    UserId::from_string(&claims.sub).map_err(|e| GateRejection::InvalidSubject(e.to_string()))
}

fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, GateRejection> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(GateRejection::MissingCredentials)?;

    // to_str only accepts visible ASCII
    let value = value.to_str().map_err(|_| GateRejection::MalformedHeader)?;

    match value.strip_prefix(BEARER_PREFIX) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(GateRejection::MalformedHeader),
    }
}

#[cfg(test)]
mod tests {
    use auth::TokenCodec;
    use axum::body::Body;
    use axum::http::HeaderValue;
    use axum::http::StatusCode;
    use axum::middleware;
    use axum::routing::get;
    use axum::Router;
    use chrono::Duration;
    use chrono::Utc;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;
    use crate::inbound::http::identity::CallerIdentity;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    async fn whoami(CallerIdentity(user_id): CallerIdentity) -> String {
        user_id.to_string()
    }

    fn app(authenticator: Arc<Authenticator>) -> Router {
        Router::new()
            .route("/whoami", get(whoami))
            .route_layer(middleware::from_fn_with_state(authenticator, authenticate))
    }

    fn authenticator() -> Arc<Authenticator> {
        Arc::new(Authenticator::new(SECRET, Duration::hours(1)).unwrap())
    }

    async fn call(router: Router, authorization: Option<&str>) -> (StatusCode, Vec<u8>) {
        let mut builder = axum::http::Request::builder().uri("/whoami");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let response = router
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_valid_token_attaches_identity() {
        let authenticator = authenticator();
        let token = authenticator.issue_token(42).unwrap();

        let (status, body) = call(
            app(authenticator),
            Some(&format!("Bearer {}", token)),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"42");
    }

    #[tokio::test]
    async fn test_every_rejection_looks_the_same() {
        let authenticator = authenticator();
        let foreign = Authenticator::new(b"another_secret_key_32_bytes_long!!", Duration::hours(1))
            .unwrap()
            .issue_token(42)
            .unwrap();
        let valid = authenticator.issue_token(42).unwrap();
        let non_numeric_subject = authenticator.issue_token("alice").unwrap();
        let expired = TokenCodec::new(SECRET, Duration::hours(1))
            .unwrap()
            .issue_at(42, Utc::now() - Duration::hours(2))
            .unwrap();

        let cases = vec![
            None,
            Some("Bearer garbage".to_string()),
            Some(format!("Bearer {}", foreign)),
            Some(format!("Basic {}", valid)),
            Some(format!("bearer {}", valid)),
            Some("Bearer ".to_string()),
            Some(format!("Bearer {}", non_numeric_subject)),
            Some(format!("Bearer {}", expired)),
        ];

        let (_, reference) = call(app(Arc::clone(&authenticator)), None).await;
        for authorization in cases {
            let (status, body) = call(
                app(Arc::clone(&authenticator)),
                authorization.as_deref(),
            )
            .await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{:?}", authorization);
            assert_eq!(body, reference, "{:?}", authorization);
        }

        let reference: serde_json::Value = serde_json::from_slice(&reference).unwrap();
        assert_eq!(reference["message"], "Unauthorized");
        assert_eq!(reference["success"], false);
    }

    #[tokio::test]
    async fn test_zero_subject_is_rejected() {
        let authenticator = authenticator();
        let token = authenticator.issue_token(0).unwrap();

        let (status, _) = call(app(authenticator), Some(&format!("Bearer {}", token))).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_extract_bearer_token() {
        let mut headers = HeaderMap::new();
        assert!(matches!(
            extract_bearer_token(&headers),
            Err(GateRejection::MissingCredentials)
        ));

        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xfftoken").unwrap(),
        );
        assert!(matches!(
            extract_bearer_token(&headers),
            Err(GateRejection::MalformedHeader)
        ));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(extract_bearer_token(&headers).unwrap(), "abc.def.ghi");
    }
}
