//! Access token issuance and verification.
//!
//! HS256 tokens carrying the user ID, issue/expiry timestamps, and a random
//! `jti` identifier. The `jti` is what gets recorded on logout, so a revoked
//! token stays dead even though the signature still verifies.

use chrono::{DateTime, Duration, Utc};
use folio_const::auth::JTI_BYTES;
use folio_types::error::{Error, Result};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind,
};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// JWT claims for user access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: user ID (Snowflake ID)
    pub sub: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Unique token identifier, recorded on logout for revocation
    pub jti: String,
}

impl Claims {
    /// Get expiration time as DateTime
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}

/// Signs and verifies user access tokens
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    /// Create a new token issuer from a shared secret
    pub fn new(secret: &str, ttl_days: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::days(ttl_days),
        }
    }

    /// Issue a new access token for the given user
    pub fn issue(&self, user_id: i64) -> Result<(String, Claims)> {
        let now = Utc::now();
        let mut jti_bytes = [0u8; JTI_BYTES];
        rand::rng().fill(&mut jti_bytes);

        let claims = Claims {
            sub: user_id,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
            jti: hex::encode(jti_bytes),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| Error::internal(format!("Failed to sign token: {e}")))?;

        Ok((token, claims))
    }

    /// Verify a token's signature and expiry, returning its claims
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let validation = Validation::new(Algorithm::HS256);

        let data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => Error::auth("token has expired"),
                    _ => Error::auth("invalid access token"),
                }
            })?;

        Ok(data.claims)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let issuer = TokenIssuer::new("test-secret", 15);

        let (token, claims) = issuer.issue(42).unwrap();
        let verified = issuer.verify(&token).unwrap();

        assert_eq!(verified.sub, 42);
        assert_eq!(verified.jti, claims.jti);
        assert_eq!(verified.exp, claims.exp);
    }

    #[test]
    fn test_jti_is_unique_per_token() {
        let issuer = TokenIssuer::new("test-secret", 15);

        let (_, c1) = issuer.issue(1).unwrap();
        let (_, c2) = issuer.issue(1).unwrap();

        assert_ne!(c1.jti, c2.jti);
        assert_eq!(c1.jti.len(), JTI_BYTES * 2);
    }

    #[test]
    fn test_wrong_secret_fails_verification() {
        let issuer = TokenIssuer::new("secret-a", 15);
        let other = TokenIssuer::new("secret-b", 15);

        let (token, _) = issuer.issue(1).unwrap();
        let err = other.verify(&token).unwrap_err();
        assert!(err.to_string().contains("invalid access token"));
    }

    #[test]
    fn test_garbage_token_fails_verification() {
        let issuer = TokenIssuer::new("secret", 15);
        assert!(issuer.verify("not.a.token").is_err());
    }

    #[test]
    fn test_expiry_matches_ttl() {
        let issuer = TokenIssuer::new("secret", 15);
        let (_, claims) = issuer.issue(1).unwrap();

        let expected = Utc::now() + Duration::days(15);
        assert!((claims.expires_at() - expected).num_seconds().abs() < 5);
    }
}
