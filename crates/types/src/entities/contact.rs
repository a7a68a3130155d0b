use bon::bon;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    resource::Resource,
};

/// Contact link shown on a profile (e.g., GitHub, LinkedIn).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Contact {
    pub id: i64,

    /// Owning profile
    pub profile_id: i64,

    pub name: String,
    pub url: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[bon]
impl Contact {
    #[builder(finish_fn = create, on(String, into))]
    pub fn new(id: i64, profile_id: i64, name: String, url: String) -> Result<Self> {
        let now = Utc::now();
        let contact = Self { id, profile_id, name, url, created_at: now, updated_at: now };
        contact.validate()?;
        Ok(contact)
    }
}

impl Resource for Contact {
    const KIND: &'static str = "contact";

    fn key_prefix() -> &'static str {
        "contact"
    }

    fn parent_prefix() -> &'static str {
        "profile"
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn parent_id(&self) -> Option<i64> {
        Some(self.profile_id)
    }

    fn set_parent_id(&mut self, parent_id: Option<i64>) {
        if let Some(id) = parent_id {
            self.profile_id = id;
        }
    }

    fn writable_fields() -> &'static [&'static str] {
        &["name", "url"]
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("name must not be empty"));
        }
        if self.url.trim().is_empty() {
            return Err(Error::validation("url must not be empty"));
        }
        Ok(())
    }
}
