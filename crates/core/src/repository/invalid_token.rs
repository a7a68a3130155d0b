use chrono::Utc;
use folio_storage::StorageBackend;
use folio_types::{
    entities::InvalidToken,
    error::{Error, Result},
};

/// Repository for revoked access tokens
///
/// Key schema: `invalid_token:jti:{jti}` → serialized [`InvalidToken`].
/// Records are written with a TTL matching the token's remaining lifetime,
/// so revocations disappear once the token would have expired anyway.
pub struct RevocationRepository<S: StorageBackend> {
    storage: S,
}

impl<S: StorageBackend> RevocationRepository<S> {
    /// Create a new repository instance
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    fn jti_key(jti: &str) -> Vec<u8> {
        format!("invalid_token:jti:{jti}").into_bytes()
    }

    /// Record a token as revoked
    pub async fn revoke(&self, record: InvalidToken) -> Result<()> {
        let data = serde_json::to_vec(&record)
            .map_err(|e| Error::internal(format!("Failed to serialize revocation: {e}")))?;

        // Keep the record alive only as long as the token itself would be
        let remaining = (record.expires_at - Utc::now()).num_seconds().max(1) as u64;

        self.storage
            .set_with_ttl(Self::jti_key(&record.jti), data, remaining)
            .await
            .map_err(|e| Error::storage(format!("Failed to store revocation: {e}")))?;

        Ok(())
    }

    /// Check whether a token identifier has been revoked
    pub async fn is_revoked(&self, jti: &str) -> Result<bool> {
        let data = self
            .storage
            .get(&Self::jti_key(jti))
            .await
            .map_err(|e| Error::storage(format!("Failed to check revocation: {e}")))?;
        Ok(data.is_some())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use chrono::Duration;
    use folio_storage::MemoryBackend;

    use super::*;

    #[tokio::test]
    async fn test_revoke_and_check() {
        let repo = RevocationRepository::new(MemoryBackend::new());

        let record = InvalidToken::builder()
            .id(1)
            .jti("abc123")
            .expires_at(Utc::now() + Duration::days(1))
            .create()
            .unwrap();

        assert!(!repo.is_revoked("abc123").await.unwrap());
        repo.revoke(record).await.unwrap();
        assert!(repo.is_revoked("abc123").await.unwrap());
        assert!(!repo.is_revoked("other-jti").await.unwrap());
    }

    #[tokio::test]
    async fn test_already_expired_token_gets_minimal_ttl() {
        let repo = RevocationRepository::new(MemoryBackend::new());

        let record = InvalidToken::builder()
            .id(2)
            .jti("expired")
            .expires_at(Utc::now() - Duration::days(1))
            .create()
            .unwrap();

        // Must not fail even though the expiry is in the past
        repo.revoke(record).await.unwrap();
    }
}
