//! Google OAuth login.
//!
//! Authorization-code flow: redirect the browser to Google with a stored
//! state nonce, then exchange the returned code for an access token and
//! fetch the user's email and name.

use folio_const::auth::OAUTH_STATE_TTL_SECONDS;
use folio_storage::StorageBackend;
use folio_types::error::{Error, Result};
use rand::Rng;
use serde::Deserialize;

const AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const USERINFO_ENDPOINT: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

/// Profile fields returned by Google's userinfo endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleUserInfo {
    pub email: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Google OAuth client
pub struct GoogleOAuth {
    client_id: String,
    client_secret: String,
    redirect_url: String,
    http: reqwest::Client,
}

impl GoogleOAuth {
    /// Create a new OAuth client
    pub fn new(client_id: String, client_secret: String, redirect_url: String) -> Self {
        Self { client_id, client_secret, redirect_url, http: reqwest::Client::new() }
    }

    /// Build the Google authorization URL for the given state nonce
    pub fn authorization_url(&self, state: &str) -> Result<String> {
        let url = url::Url::parse_with_params(
            AUTH_ENDPOINT,
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_url.as_str()),
                ("response_type", "code"),
                ("scope", "openid email profile"),
                ("state", state),
            ],
        )
        .map_err(|e| Error::internal(format!("Failed to build authorization URL: {e}")))?;

        Ok(url.into())
    }

    /// Exchange an authorization code for an access token
    pub async fn exchange_code(&self, code: &str) -> Result<String> {
        let response = self
            .http
            .post(TOKEN_ENDPOINT)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", self.redirect_url.as_str()),
                ("grant_type", "authorization_code"),
                ("code", code),
            ])
            .send()
            .await
            .map_err(|e| Error::external(format!("Token exchange request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::external(format!(
                "Token exchange rejected with status {}",
                response.status()
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| Error::external(format!("Invalid token response: {e}")))?;

        Ok(token.access_token)
    }

    /// Fetch the authenticated user's profile
    pub async fn fetch_userinfo(&self, access_token: &str) -> Result<GoogleUserInfo> {
        let response = self
            .http
            .get(USERINFO_ENDPOINT)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| Error::external(format!("Userinfo request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::external(format!(
                "Userinfo rejected with status {}",
                response.status()
            )));
        }

        response.json().await.map_err(|e| Error::external(format!("Invalid userinfo response: {e}")))
    }
}

/// Short-lived state nonces tying a login redirect to its callback
pub struct OAuthStateStore<S: StorageBackend> {
    storage: S,
}

impl<S: StorageBackend> OAuthStateStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    fn state_key(state: &str) -> Vec<u8> {
        format!("oauth_state:{state}").into_bytes()
    }

    /// Generate and store a fresh state nonce
    pub async fn issue(&self) -> Result<String> {
        let mut bytes = [0u8; 16];
        rand::rng().fill(&mut bytes);
        let state = hex::encode(bytes);

        self.storage
            .set_with_ttl(Self::state_key(&state), vec![1], OAUTH_STATE_TTL_SECONDS)
            .await
            .map_err(|e| Error::storage(format!("Failed to store OAuth state: {e}")))?;

        Ok(state)
    }

    /// Consume a state nonce, returning whether it was valid
    ///
    /// Deletion happens unconditionally so a nonce cannot be replayed.
    pub async fn consume(&self, state: &str) -> Result<bool> {
        let key = Self::state_key(state);

        let stored = self
            .storage
            .get(&key)
            .await
            .map_err(|e| Error::storage(format!("Failed to read OAuth state: {e}")))?;

        if stored.is_none() {
            return Ok(false);
        }

        self.storage
            .delete(&key)
            .await
            .map_err(|e| Error::storage(format!("Failed to delete OAuth state: {e}")))?;

        Ok(true)
    }
}
