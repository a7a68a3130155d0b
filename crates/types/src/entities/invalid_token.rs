use bon::bon;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Revocation record for a logged-out access token.
///
/// Appending a token's `jti` here kills the token immediately; the
/// auth middleware consults the jti index on every request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InvalidToken {
    pub id: i64,

    /// The revoked token's unique identifier claim
    pub jti: String,

    /// When the underlying token would have expired anyway
    pub expires_at: DateTime<Utc>,

    pub created_at: DateTime<Utc>,
}

#[bon]
impl InvalidToken {
    #[builder(finish_fn = create, on(String, into))]
    pub fn new(id: i64, jti: String, expires_at: DateTime<Utc>) -> Result<Self> {
        if jti.trim().is_empty() {
            return Err(Error::validation("jti must not be empty"));
        }
        Ok(Self { id, jti, expires_at, created_at: Utc::now() })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn builder_rejects_empty_jti() {
        let result = InvalidToken::builder().id(1).jti("").expires_at(Utc::now()).create();
        assert!(result.is_err());
    }
}
