use bon::bon;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    resource::Resource,
};

/// Account owner. Holds the argon2 password hash; OAuth-only accounts
/// have no hash at all.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Unique user ID (Snowflake ID)
    pub id: i64,

    /// Display name
    pub name: String,

    /// Email address (unique across all users)
    pub email: String,

    /// Optional phone number
    pub phone: Option<String>,

    /// Argon2id password hash. `None` for OAuth-only accounts.
    pub password_hash: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[bon]
impl User {
    #[builder(finish_fn = create, on(String, into))]
    pub fn new(
        id: i64,
        name: String,
        email: String,
        phone: Option<String>,
        password_hash: Option<String>,
    ) -> Result<Self> {
        let now = Utc::now();
        let user =
            Self { id, name, email, phone, password_hash, created_at: now, updated_at: now };
        user.validate()?;
        Ok(user)
    }

    /// Whether this account can log in with a password
    pub fn has_password(&self) -> bool {
        self.password_hash.is_some()
    }
}

impl Resource for User {
    const KIND: &'static str = "user";

    fn key_prefix() -> &'static str {
        "user"
    }

    fn parent_prefix() -> &'static str {
        ""
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn parent_id(&self) -> Option<i64> {
        None
    }

    fn set_parent_id(&mut self, _parent_id: Option<i64>) {}

    fn unique_prefix() -> Option<&'static str> {
        Some("email")
    }

    fn unique_value(&self) -> Option<String> {
        Some(self.email.clone())
    }

    fn writable_fields() -> &'static [&'static str] {
        &["name", "email", "phone"]
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("name must not be empty"));
        }
        if self.email.trim().is_empty() || !self.email.contains('@') {
            return Err(Error::validation("email must be a valid address"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn builder_creates_valid_user() {
        let user = User::builder()
            .id(1)
            .name("Ada")
            .email("ada@example.com")
            .password_hash("$argon2id$stub".to_string())
            .create()
            .unwrap();

        assert_eq!(user.id, 1);
        assert!(user.has_password());
        assert_eq!(user.unique_value().as_deref(), Some("ada@example.com"));
    }

    #[test]
    fn builder_rejects_invalid_email() {
        let result = User::builder().id(1).name("Ada").email("not-an-email").create();
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));
    }

    #[test]
    fn builder_rejects_empty_name() {
        let result = User::builder().id(1).name("  ").email("a@b.com").create();
        assert!(result.is_err());
    }

    #[test]
    fn oauth_account_has_no_password() {
        let user =
            User::builder().id(2).name("Sso").email("sso@example.com").create().unwrap();
        assert!(!user.has_password());
    }
}
