use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::current_user::current_user;
use super::handlers::login::login;
use super::handlers::register::register;
use super::handlers::todos;
use super::middleware::authenticate as auth_middleware;
use crate::domain::todo::ports::TodoServicePort;
use crate::domain::user::ports::AuthServicePort;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthServicePort>,
    pub todo_service: Arc<dyn TodoServicePort>,
}

pub fn create_router(
    auth_service: Arc<dyn AuthServicePort>,
    todo_service: Arc<dyn TodoServicePort>,
    authenticator: Arc<Authenticator>,
) -> Router {
    let state = AppState {
        auth_service,
        todo_service,
    };

    let public_routes = Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login));

    let protected_routes = Router::new()
        .route("/auth/me", get(current_user))
        .route("/todo/get-todos", get(todos::list_todo_items))
        .route("/todo/create-todo-item", post(todos::create_todo_item))
        .route("/todo/create-todo-note", post(todos::create_todo_note))
        .route("/todo/update-todo-item", put(todos::update_todo_item))
        .route("/todo/delete-todo-item", delete(todos::delete_todo_item))
        .route_layer(middleware::from_fn_with_state(
            authenticator,
            auth_middleware,
        ));

    // Headers are left out of the span: they carry bearer tokens
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    let api = Router::new().merge(public_routes).merge(protected_routes);

    Router::new()
        .route("/", get(welcome))
        .nest("/api/v1", api)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn welcome() -> &'static str {
    "Welcome to Todo API"
}
