//! One-time password store for password resets.
//!
//! Six-digit codes keyed by email with a short TTL. Consumption deletes the
//! stored code before comparing, so a code can never be tried twice.

use folio_const::auth::{OTP_MAX, OTP_MIN, OTP_TTL_SECONDS};
use folio_storage::StorageBackend;
use folio_types::error::{Error, Result};
use rand::Rng;

/// Stores and validates password reset codes
pub struct OtpStore<S: StorageBackend> {
    storage: S,
}

impl<S: StorageBackend> OtpStore<S> {
    /// Create a new OTP store
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    fn otp_key(email: &str) -> Vec<u8> {
        format!("otp:{email}").into_bytes()
    }

    /// Generate and store a fresh code for the given email
    ///
    /// Overwrites any previous code for the same email; only the most
    /// recently issued code is valid.
    pub async fn issue(&self, email: &str) -> Result<String> {
        let code = rand::rng().random_range(OTP_MIN..=OTP_MAX).to_string();

        self.storage
            .set_with_ttl(Self::otp_key(email), code.as_bytes().to_vec(), OTP_TTL_SECONDS)
            .await
            .map_err(|e| Error::storage(format!("Failed to store reset code: {e}")))?;

        Ok(code)
    }

    /// Consume the stored code for an email, returning whether it matched
    ///
    /// The stored code is deleted before comparison. A wrong guess therefore
    /// also invalidates the code, and a correct code works exactly once.
    pub async fn consume(&self, email: &str, code: &str) -> Result<bool> {
        let key = Self::otp_key(email);

        let stored = self
            .storage
            .get(&key)
            .await
            .map_err(|e| Error::storage(format!("Failed to read reset code: {e}")))?;

        let Some(stored) = stored else {
            return Ok(false);
        };

        self.storage
            .delete(&key)
            .await
            .map_err(|e| Error::storage(format!("Failed to delete reset code: {e}")))?;

        Ok(stored.as_ref() == code.as_bytes())
    }
}
