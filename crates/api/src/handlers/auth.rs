//! Authentication handlers: registration, password login, logout, the
//! password reset flow, and Google OAuth login.

use axum::{
    Json,
    extract::{Extension, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Redirect, Response},
};
use folio_const::{
    auth::{OTP_TTL_SECONDS, SESSION_COOKIE_NAME},
    limits::MIN_PASSWORD_LENGTH,
};
use folio_core::{
    EmailTemplate, IdGenerator, OAuthStateStore, OtpStore, OutboundEmail,
    PasswordResetEmailTemplate, hash_password, verify_password,
};
use folio_types::{
    Error,
    dto::{
        ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, RegisterRequest,
        ResetPasswordRequest, UserView,
    },
    entities::{InvalidToken, Profile, User},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    AppState,
    envelope::{ApiResult, created, success},
    extract::ApiJson,
    middleware::AuthContext,
};

/// Build a session response: token plus user in the body, and the token
/// again as an HttpOnly cookie for browser clients
fn session_response(state: &AppState, user: User) -> ApiResult<Response> {
    let (token, claims) = state.issuer.issue(user.id)?;

    let cookie = format!(
        "{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        (claims.exp - claims.iat).max(0)
    );
    let cookie = header::HeaderValue::from_str(&cookie)
        .map_err(|e| Error::internal(format!("Failed to build session cookie: {e}")))?;

    let mut response =
        success(json!({ "token": token, "user": UserView::from(user) })).into_response();
    response.headers_mut().insert(header::SET_COOKIE, cookie);
    Ok(response)
}

fn check_password_strength(password: &str) -> ApiResult<()> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(Error::validation(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        ))
        .into());
    }
    Ok(())
}

/// POST /api/v1/auth/register
///
/// Creates the user and an empty profile in a single commit.
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let (name, email, password) = payload.required()?;
    check_password_strength(&password)?;

    let repos = state.repos();
    if repos.users.find_by_unique(&email).await?.is_some() {
        return Err(Error::already_exists("email already registered").into());
    }

    let user = User::builder()
        .id(IdGenerator::next_id())
        .name(name)
        .email(email)
        .maybe_phone(payload.phone)
        .password_hash(hash_password(&password)?)
        .create()?;
    let profile = Profile::builder().id(IdGenerator::next_id()).user_id(user.id).create()?;
    let (user, _) = repos.create_user_with_profile(user, profile).await?;

    tracing::info!(user_id = user.id, "User registered");
    Ok(created(UserView::from(user)))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> ApiResult<Response> {
    let repos = state.repos();
    let user = repos
        .users
        .find_by_unique(&payload.email)
        .await?
        .ok_or_else(|| Error::credentials("email not registered"))?;

    let Some(hash) = user.password_hash.as_deref() else {
        return Err(Error::credentials("account has no password, use Google login").into());
    };
    if !verify_password(&payload.password, hash)? {
        return Err(Error::credentials("password is incorrect").into());
    }

    session_response(&state, user)
}

/// POST /api/v1/auth/logout
///
/// Records the token's `jti` as revoked for the token's remaining lifetime
/// and clears the session cookie.
pub async fn logout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Response> {
    let record = InvalidToken::builder()
        .id(IdGenerator::next_id())
        .jti(auth.jti)
        .expires_at(auth.expires_at)
        .create()?;
    state.repos().revocations.revoke(record).await?;

    let cookie = format!("{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; Max-Age=0");
    let cookie = header::HeaderValue::from_str(&cookie)
        .map_err(|e| Error::internal(format!("Failed to build session cookie: {e}")))?;
    let mut response = success(json!({ "message": "logged out" })).into_response();
    response.headers_mut().insert(header::SET_COOKIE, cookie);
    Ok(response)
}

/// POST /api/v1/auth/forgot-password
///
/// Issues a six-digit reset code and emails it to the account's address.
pub async fn forgot_password(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ForgotPasswordRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let repos = state.repos();
    let user = repos
        .users
        .find_by_unique(&payload.email)
        .await?
        .ok_or_else(|| Error::credentials("email not registered"))?;

    let otp = OtpStore::new((*state.storage).clone()).issue(&user.email).await?;

    let template = PasswordResetEmailTemplate {
        name: user.name.clone(),
        otp,
        ttl_minutes: OTP_TTL_SECONDS / 60,
    };
    state.mailer.enqueue(OutboundEmail {
        to: user.email,
        subject: template.subject(),
        body_html: template.body_html(),
        body_text: template.body_text(),
    });

    Ok(success(json!({ "message": "reset code sent" })))
}

/// POST /api/v1/auth/reset-password
///
/// Consumes the reset code; a wrong guess burns it.
pub async fn reset_password(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ResetPasswordRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    check_password_strength(&payload.new_password)?;

    let repos = state.repos();
    let mut user = repos
        .users
        .find_by_unique(&payload.email)
        .await?
        .ok_or_else(|| Error::credentials("email not registered"))?;

    let matched = OtpStore::new((*state.storage).clone())
        .consume(&user.email, &payload.otp)
        .await?;
    if !matched {
        return Err(Error::credentials("wrong otp or has expired").into());
    }

    user.password_hash = Some(hash_password(&payload.new_password)?);
    repos.users.put(user).await?;

    Ok(success(json!({ "message": "password reset" })))
}

/// POST /api/v1/auth/change-password
pub async fn change_password(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiJson(payload): ApiJson<ChangePasswordRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    check_password_strength(&payload.new_password)?;

    let repos = state.repos();
    let mut user = repos.users.require(auth.user_id).await?;

    let Some(hash) = user.password_hash.as_deref() else {
        return Err(Error::credentials("account has no password, use Google login").into());
    };
    if !verify_password(&payload.current_password, hash)? {
        return Err(Error::credentials("wrong current password").into());
    }

    user.password_hash = Some(hash_password(&payload.new_password)?);
    repos.users.put(user).await?;

    Ok(success(json!({ "message": "password changed" })))
}

/// GET /api/v1/users/current-user
pub async fn current_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let user = state.repos().users.require(auth.user_id).await?;
    Ok(success(UserView::from(user)))
}

/// GET /api/v1/auth/google-login
///
/// Stores a fresh state nonce and redirects the browser to Google.
pub async fn google_login(State(state): State<AppState>) -> ApiResult<Response> {
    let Some(oauth) = state.oauth.as_ref() else {
        return Err(Error::config("Google login is not configured").into());
    };

    let nonce = OAuthStateStore::new((*state.storage).clone()).issue().await?;
    let url = oauth.authorization_url(&nonce)?;
    Ok(Redirect::temporary(&url).into_response())
}

#[derive(Debug, Deserialize)]
pub struct OAuthCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// GET /api/v1/auth/login-callback
///
/// Validates the state nonce, exchanges the code, and logs the Google
/// account in, creating the user and an empty profile on first login.
/// Provider-side failures are logged but reported uniformly.
pub async fn login_callback(
    State(state): State<AppState>,
    Query(query): Query<OAuthCallbackQuery>,
) -> ApiResult<Response> {
    let Some(oauth) = state.oauth.as_ref() else {
        return Err(Error::config("Google login is not configured").into());
    };

    if let Some(error) = query.error {
        tracing::warn!(error, "OAuth provider returned an error");
        return Err(Error::auth("authentication failed").into());
    }
    let (Some(code), Some(nonce)) = (query.code, query.state) else {
        return Err(Error::auth("authentication failed").into());
    };

    let valid = OAuthStateStore::new((*state.storage).clone()).consume(&nonce).await?;
    if !valid {
        tracing::warn!("OAuth callback with unknown or replayed state nonce");
        return Err(Error::auth("authentication failed").into());
    }

    let access_token = match oauth.exchange_code(&code).await {
        Ok(token) => token,
        Err(e) => {
            tracing::warn!(error = %e, "OAuth code exchange failed");
            return Err(Error::auth("authentication failed").into());
        }
    };
    let info = match oauth.fetch_userinfo(&access_token).await {
        Ok(info) => info,
        Err(e) => {
            tracing::warn!(error = %e, "OAuth userinfo fetch failed");
            return Err(Error::auth("authentication failed").into());
        }
    };

    let repos = state.repos();
    let user = match repos.users.find_by_unique(&info.email).await? {
        Some(user) => user,
        None => {
            let name = if info.name.trim().is_empty() {
                info.email.split('@').next().unwrap_or_default().to_string()
            } else {
                info.name
            };

            let user = User::builder()
                .id(IdGenerator::next_id())
                .name(name)
                .email(info.email)
                .create()?;
            let profile =
                Profile::builder().id(IdGenerator::next_id()).user_id(user.id).create()?;
            let (user, _) = repos.create_user_with_profile(user, profile).await?;

            tracing::info!(user_id = user.id, "User created via Google login");
            user
        }
    };

    session_response(&state, user)
}
