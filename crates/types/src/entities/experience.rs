use bon::bon;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    resource::Resource,
};

/// Concrete outcome achieved during a work engagement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Experience {
    pub id: i64,

    /// Owning work entry
    pub work_id: i64,

    pub result: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[bon]
impl Experience {
    #[builder(finish_fn = create, on(String, into))]
    pub fn new(id: i64, work_id: i64, result: String) -> Result<Self> {
        let now = Utc::now();
        let experience = Self { id, work_id, result, created_at: now, updated_at: now };
        experience.validate()?;
        Ok(experience)
    }
}

impl Resource for Experience {
    const KIND: &'static str = "experience";

    fn key_prefix() -> &'static str {
        "experience"
    }

    fn parent_prefix() -> &'static str {
        "work"
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn parent_id(&self) -> Option<i64> {
        Some(self.work_id)
    }

    fn set_parent_id(&mut self, parent_id: Option<i64>) {
        if let Some(id) = parent_id {
            self.work_id = id;
        }
    }

    fn writable_fields() -> &'static [&'static str] {
        &["result"]
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    fn validate(&self) -> Result<()> {
        if self.result.trim().is_empty() {
            return Err(Error::validation("result must not be empty"));
        }
        Ok(())
    }
}
