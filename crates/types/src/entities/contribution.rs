use bon::bon;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    resource::Resource,
};

/// Open-source contribution. The `descriptions`, `impacts`, `technologies`
/// and `skills` fields are all `::`-delimited lists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Contribution {
    pub id: i64,

    /// Owning user
    pub user_id: i64,

    pub name: String,
    pub repo_url: String,
    pub contribution_type: Option<String>,
    pub role: Option<String>,
    pub date: Option<NaiveDate>,

    /// Delimited lists (see [`crate::delimited`])
    pub descriptions: String,
    pub impacts: String,
    pub technologies: String,
    pub skills: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[bon]
impl Contribution {
    #[builder(finish_fn = create, on(String, into))]
    pub fn new(
        id: i64,
        user_id: i64,
        name: String,
        repo_url: String,
        contribution_type: Option<String>,
        role: Option<String>,
        date: Option<NaiveDate>,
        #[builder(default)] descriptions: String,
        #[builder(default)] impacts: String,
        #[builder(default)] technologies: String,
        #[builder(default)] skills: String,
    ) -> Result<Self> {
        let now = Utc::now();
        let contribution = Self {
            id,
            user_id,
            name,
            repo_url,
            contribution_type,
            role,
            date,
            descriptions,
            impacts,
            technologies,
            skills,
            created_at: now,
            updated_at: now,
        };
        contribution.validate()?;
        Ok(contribution)
    }
}

impl Resource for Contribution {
    const KIND: &'static str = "contribution";

    fn key_prefix() -> &'static str {
        "contribution"
    }

    fn parent_prefix() -> &'static str {
        "user"
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn parent_id(&self) -> Option<i64> {
        Some(self.user_id)
    }

    fn set_parent_id(&mut self, parent_id: Option<i64>) {
        if let Some(id) = parent_id {
            self.user_id = id;
        }
    }

    fn writable_fields() -> &'static [&'static str] {
        &[
            "name",
            "repo_url",
            "contribution_type",
            "role",
            "date",
            "descriptions",
            "impacts",
            "technologies",
            "skills",
        ]
    }

    fn list_fields() -> &'static [&'static str] {
        &["descriptions", "impacts", "technologies", "skills"]
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("name must not be empty"));
        }
        if self.repo_url.trim().is_empty() {
            return Err(Error::validation("repo_url must not be empty"));
        }
        Ok(())
    }
}
