//! Password reset with one-time codes.
//!
//! The reset code normally travels by email; here it is planted directly
//! in the OTP store backing the same state the router serves from.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::http::StatusCode;
use folio_api::build_router;
use folio_core::OtpStore;
use folio_test_fixtures::{body_json, create_test_state, register_user, send_json};
use serde_json::json;

#[tokio::test]
async fn forgot_password_reports_unknown_email() {
    let state = create_test_state().await;
    let app = build_router(state);

    let response = send_json(
        &app,
        "POST",
        "/api/v1/auth/forgot-password",
        None,
        json!({ "email": "nobody@example.com" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["data"]["error"], "email not registered");
}

#[tokio::test]
async fn forgot_password_accepts_known_email() {
    let state = create_test_state().await;
    let app = build_router(state);
    register_user(&app, "Ada", "ada@example.com", "correct horse").await;

    let response = send_json(
        &app,
        "POST",
        "/api/v1/auth/forgot-password",
        None,
        json!({ "email": "ada@example.com" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn reset_password_with_valid_code() {
    let state = create_test_state().await;
    let app = build_router(state.clone());
    register_user(&app, "Ada", "ada@example.com", "correct horse").await;

    let otp = OtpStore::new((*state.storage).clone()).issue("ada@example.com").await.unwrap();

    let response = send_json(
        &app,
        "POST",
        "/api/v1/auth/reset-password",
        None,
        json!({ "email": "ada@example.com", "otp": otp, "new_password": "fresh password" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Only the new password logs in
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
        json!({ "email": "ada@example.com", "password": "fresh password" }),
    )
    .await;
    assert_eq!(new.status(), StatusCode::OK);
}

#[tokio::test]
async fn reset_code_is_single_use() {
    let state = create_test_state().await;
    let app = build_router(state.clone());
    register_user(&app, "Ada", "ada@example.com", "correct horse").await;

    let otp = OtpStore::new((*state.storage).clone()).issue("ada@example.com").await.unwrap();

    let payload =
        json!({ "email": "ada@example.com", "otp": otp, "new_password": "fresh password" });
    let first = send_json(&app, "POST", "/api/v1/auth/reset-password", None, payload.clone()).await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = send_json(&app, "POST", "/api/v1/auth/reset-password", None, payload).await;
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);

    let body = body_json(second).await;
    assert_eq!(body["data"]["error"], "wrong otp or has expired");
}

#[tokio::test]
async fn wrong_guess_burns_the_code() {
    let state = create_test_state().await;
    let app = build_router(state.clone());
    register_user(&app, "Ada", "ada@example.com", "correct horse").await;

    let otp = OtpStore::new((*state.storage).clone()).issue("ada@example.com").await.unwrap();

    let wrong = send_json(
        &app,
        "POST",
        "/api/v1/auth/reset-password",
        None,
        json!({ "email": "ada@example.com", "otp": "000000", "new_password": "fresh password" }),
    )
    .await;
    assert_eq!(wrong.status(), StatusCode::BAD_REQUEST);

    // The real code was deleted before the comparison
    let real = send_json(
        &app,
        "POST",
        "/api/v1/auth/reset-password",
        None,
        json!({ "email": "ada@example.com", "otp": otp, "new_password": "fresh password" }),
    )
    .await;
    assert_eq!(real.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn reset_rejects_short_new_password() {
    let state = create_test_state().await;
    let app = build_router(state.clone());
    register_user(&app, "Ada", "ada@example.com", "correct horse").await;

    let otp = OtpStore::new((*state.storage).clone()).issue("ada@example.com").await.unwrap();

    let response = send_json(
        &app,
        "POST",
        "/api/v1/auth/reset-password",
        None,
        json!({ "email": "ada@example.com", "otp": otp, "new_password": "tiny" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
