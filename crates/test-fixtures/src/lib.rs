// Test fixtures are allowed to use unwrap/expect for clear failure messages
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![deny(unsafe_code)]

//! Shared helpers for portfolio API integration tests.
//!
//! Builds an in-memory application, drives it through
//! `tower::ServiceExt::oneshot`, and extracts tokens and bodies from the
//! responses.
//!
//! ```rust,no_run
//! use folio_test_fixtures::{create_test_app, register_and_login};
//!
//! # async fn example() {
//! let app = create_test_app().await;
//! let session = register_and_login(&app, "Ada", "ada@example.com", "correct horse").await;
//! // Authenticated requests: .header("authorization", format!("Bearer {}", session.token))
//! # }
//! ```

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode},
};
use folio_api::AppState;
use folio_core::IdGenerator;
use folio_storage::Backend;
use serde_json::{Value, json};
use tower::ServiceExt;

/// An authenticated test session
pub struct TestSession {
    /// Bearer token for the Authorization header
    pub token: String,
    /// The logged-in user's ID
    pub user_id: i64,
}

/// Create a test state over in-memory storage
pub async fn create_test_state() -> AppState {
    let _ = IdGenerator::init(1);
    AppState::new_test(Arc::new(Backend::memory())).await.expect("test state")
}

/// Create the full application router over in-memory storage
pub async fn create_test_app() -> Router {
    folio_api::build_router(create_test_state().await)
}

/// Send a JSON request and return the raw response
pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Value,
) -> Response<Body> {
    let mut builder =
        Request::builder().method(method).uri(uri).header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    app.clone().oneshot(request).await.unwrap()
}

/// Send a bodyless request and return the raw response
pub async fn send(app: &Router, method: &str, uri: &str, token: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = builder.body(Body::empty()).unwrap();
    app.clone().oneshot(request).await.unwrap()
}

/// Parse a response body as JSON
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Register a user, panicking unless the API reports 201
///
/// Returns the created user's ID.
pub async fn register_user(app: &Router, name: &str, email: &str, password: &str) -> i64 {
    let response = send_json(
        app,
        "POST",
        "/api/v1/auth/register",
        None,
        json!({ "name": name, "email": email, "password": password }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED, "registration should succeed");
    let body = body_json(response).await;
    body["data"]["id"].as_i64().expect("registered user id")
}

/// Log a registered user in and return the bearer token
pub async fn login_user(app: &Router, email: &str, password: &str) -> String {
    let response = send_json(
        app,
        "POST",
        "/api/v1/auth/login",
        None,
        json!({ "email": email, "password": password }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK, "login should succeed");
    let body = body_json(response).await;
    body["data"]["token"].as_str().expect("access token").to_string()
}

/// Register and log in, returning the session
pub async fn register_and_login(
    app: &Router,
    name: &str,
    email: &str,
    password: &str,
) -> TestSession {
    let user_id = register_user(app, name, email, password).await;
    let token = login_user(app, email, password).await;
    TestSession { token, user_id }
}

/// Extract the session cookie value from a login response
pub fn extract_token_cookie(headers: &axum::http::HeaderMap) -> Option<String> {
    headers
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(';').next())
        .and_then(|cookie| cookie.strip_prefix("folio_token="))
        .map(|s| s.to_string())
}
