use bon::bon;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    resource::Resource,
};

/// Portfolio project. `skills` is a `::`-delimited list; listings are
/// returned newest-first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    pub id: i64,

    /// Owning user
    pub user_id: i64,

    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub project_url: Option<String>,
    pub github_url: Option<String>,

    /// Delimited skills list (see [`crate::delimited`])
    pub skills: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[bon]
impl Project {
    #[builder(finish_fn = create, on(String, into))]
    pub fn new(
        id: i64,
        user_id: i64,
        title: String,
        description: String,
        image_url: Option<String>,
        video_url: Option<String>,
        project_url: Option<String>,
        github_url: Option<String>,
        #[builder(default)] skills: String,
    ) -> Result<Self> {
        let now = Utc::now();
        let project = Self {
            id,
            user_id,
            title,
            description,
            image_url,
            video_url,
            project_url,
            github_url,
            skills,
            created_at: now,
            updated_at: now,
        };
        project.validate()?;
        Ok(project)
    }
}

impl Resource for Project {
    const KIND: &'static str = "project";

    fn key_prefix() -> &'static str {
        "project"
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
        &["title", "description", "image_url", "video_url", "project_url", "github_url", "skills"]
    }

    fn list_fields() -> &'static [&'static str] {
        &["skills"]
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::validation("title must not be empty"));
        }
        if self.description.trim().is_empty() {
            return Err(Error::validation("description must not be empty"));
        }
        Ok(())
    }

    fn sort_listing(items: &mut [Self]) {
        // Newest first
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    }
}
