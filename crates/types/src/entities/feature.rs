use bon::bon;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    resource::Resource,
};

/// Highlighted capability of a project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Feature {
    pub id: i64,

    /// Owning project
    pub project_id: i64,

    pub name: String,
    pub description: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[bon]
impl Feature {
    #[builder(finish_fn = create, on(String, into))]
    pub fn new(id: i64, project_id: i64, name: String, description: String) -> Result<Self> {
        let now = Utc::now();
        let feature = Self { id, project_id, name, description, created_at: now, updated_at: now };
        feature.validate()?;
        Ok(feature)
    }
}

impl Resource for Feature {
    const KIND: &'static str = "feature";

    fn key_prefix() -> &'static str {
        "feature"
    }

    fn parent_prefix() -> &'static str {
        "project"
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn parent_id(&self) -> Option<i64> {
        Some(self.project_id)
    }

    fn set_parent_id(&mut self, parent_id: Option<i64>) {
        if let Some(id) = parent_id {
            self.project_id = id;
        }
    }

    fn writable_fields() -> &'static [&'static str] {
        &["name", "description"]
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("name must not be empty"));
        }
        Ok(())
    }
}
