//! Session authentication middleware.
//!
//! Accepts the access token from an `Authorization: Bearer` header or the
//! session cookie, verifies signature and expiry, and rejects tokens whose
//! `jti` has been revoked by a logout. Verified requests carry an
//! [`AuthContext`] extension.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};
use folio_const::auth::SESSION_COOKIE_NAME;
use folio_types::Error;

use crate::{AppState, envelope::ApiError};

/// Identity attached to authenticated requests
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Authenticated user's ID
    pub user_id: i64,
    /// Token identifier, recorded on logout
    pub jti: String,
    /// When the presented token expires
    pub expires_at: DateTime<Utc>,
}

/// Pull the access token out of the request headers
///
/// The `Authorization` header wins over the cookie so API clients can
/// override a stale browser session.
fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    bearer.or_else(|| {
        headers
            .get(axum::http::header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|cookies| {
                cookies.split(';').map(str::trim).find_map(|pair| {
                    pair.strip_prefix(SESSION_COOKIE_NAME)
                        .and_then(|rest| rest.strip_prefix('='))
                        .map(str::to_string)
                })
            })
            .filter(|v| !v.is_empty())
    })
}

/// Require a valid, unrevoked access token
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = token_from_headers(request.headers())
        .ok_or_else(|| Error::auth("missing access token"))?;

    let claims = state.issuer.verify(&token)?;

    if state.repos().revocations.is_revoked(&claims.jti).await? {
        return Err(Error::auth("token has been revoked").into());
    }

    let expires_at = claims.expires_at();
    request.extensions_mut().insert(AuthContext {
        user_id: claims.sub,
        jti: claims.jti,
        expires_at,
    });

    Ok(next.run(request).await)
}
