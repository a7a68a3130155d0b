//! Registration and login flow.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::http::StatusCode;
use folio_test_fixtures::{body_json, create_test_app, register_and_login, send, send_json};
use serde_json::json;

#[tokio::test]
async fn register_creates_user_and_profile() {
    let app = create_test_app().await;

    let response = send_json(
        &app,
        "POST",
        "/api/v1/auth/register",
        None,
        json!({ "name": "Ada", "email": "ada@example.com", "password": "correct horse" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["email"], "ada@example.com");
    // The password hash never leaves the API
    assert!(body["data"].get("password_hash").is_none());

    // An empty profile exists from the start
    let user_id = body["data"]["id"].as_i64().unwrap();
    let response = send(&app, "GET", &format!("/api/v1/users/{user_id}/profile"), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let profile = body_json(response).await;
    assert_eq!(profile["data"]["user_id"].as_i64(), Some(user_id));
    assert!(profile["data"]["bio"].is_null());
}

#[tokio::test]
async fn register_rejects_duplicate_email() {
    let app = create_test_app().await;
    let payload = json!({ "name": "Ada", "email": "ada@example.com", "password": "correct horse" });

    let first = send_json(&app, "POST", "/api/v1/auth/register", None, payload.clone()).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = send_json(&app, "POST", "/api/v1/auth/register", None, payload).await;
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);

    let body = body_json(second).await;
    assert_eq!(body["status"], "fail");
    assert_eq!(body["data"]["error"], "email already registered");
}

#[tokio::test]
async fn register_reports_all_missing_fields() {
    let app = create_test_app().await;

    let response = send_json(
        &app,
        "POST",
        "/api/v1/auth/register",
        None,
        json!({ "email": "ada@example.com" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    assert_eq!(body["data"]["error"], "missing required fields: name, password");
}

#[tokio::test]
async fn register_rejects_short_password() {
    let app = create_test_app().await;

    let response = send_json(
        &app,
        "POST",
        "/api/v1/auth/register",
        None,
        json!({ "name": "Ada", "email": "ada@example.com", "password": "short" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_roundtrip_sets_cookie_and_token() {
    let app = create_test_app().await;
    folio_test_fixtures::register_user(&app, "Ada", "ada@example.com", "correct horse").await;

    let response = send_json(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        json!({ "email": "ada@example.com", "password": "correct horse" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = folio_test_fixtures::extract_token_cookie(response.headers());
    assert!(cookie.is_some(), "login should set the session cookie");

    let body = body_json(response).await;
    let token = body["data"]["token"].as_str().unwrap();
    assert_eq!(cookie.unwrap(), token);

    // The token authenticates requests
    let response = send(&app, "GET", "/api/v1/users/current-user", Some(token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let me = body_json(response).await;
    assert_eq!(me["data"]["email"], "ada@example.com");
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let app = create_test_app().await;
    folio_test_fixtures::register_user(&app, "Ada", "ada@example.com", "correct horse").await;

    let response = send_json(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        json!({ "email": "ada@example.com", "password": "wrong" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["data"]["error"], "password is incorrect");
}

#[tokio::test]
async fn login_reports_unknown_email() {
    let app = create_test_app().await;

    let response = send_json(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        json!({ "email": "nobody@example.com", "password": "whatever" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["data"]["error"], "email not registered");
}

#[tokio::test]
async fn change_password_requires_current_password() {
    let app = create_test_app().await;
    let session = register_and_login(&app, "Ada", "ada@example.com", "correct horse").await;

    let response = send_json(
        &app,
        "POST",
        "/api/v1/auth/change-password",
        Some(&session.token),
        json!({ "current_password": "wrong", "new_password": "new password" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["data"]["error"], "wrong current password");

    let response = send_json(
        &app,
        "POST",
        "/api/v1/auth/change-password",
        Some(&session.token),
        json!({ "current_password": "correct horse", "new_password": "new password" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Old password no longer works, the new one does
    let old = send_json(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        json!({ "email": "ada@example.com", "password": "correct horse" }),
    )
    .await;
    assert_eq!(old.status(), StatusCode::BAD_REQUEST);

    let new = send_json(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        json!({ "email": "ada@example.com", "password": "new password" }),
    )
    .await;
    assert_eq!(new.status(), StatusCode::OK);
}

#[tokio::test]
async fn non_json_body_is_rejected() {
    let app = create_test_app().await;

    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/auth/login")
        .header("content-type", "text/plain")
        .body(Body::from("email=x"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["status"], "fail");
}
