use bon::bon;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    resource::Resource,
};

/// Offered service advertised on a profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Service {
    pub id: i64,

    /// Owning profile
    pub profile_id: i64,

    pub title: String,
    pub description: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[bon]
impl Service {
    #[builder(finish_fn = create, on(String, into))]
    pub fn new(id: i64, profile_id: i64, title: String, description: String) -> Result<Self> {
        let now = Utc::now();
        let service = Self { id, profile_id, title, description, created_at: now, updated_at: now };
        service.validate()?;
        Ok(service)
    }
}

impl Resource for Service {
    const KIND: &'static str = "service";

    fn key_prefix() -> &'static str {
        "service"
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
        &["title", "description"]
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::validation("title must not be empty"));
        }
        Ok(())
    }
}
