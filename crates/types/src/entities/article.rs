use bon::bon;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    resource::Resource,
};

/// Written piece. `tags` is a `::`-delimited list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Article {
    pub id: i64,

    /// Owning user
    pub user_id: i64,

    pub title: String,
    pub content: String,

    /// Delimited tags list (see [`crate::delimited`])
    pub tags: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[bon]
impl Article {
    #[builder(finish_fn = create, on(String, into))]
    pub fn new(
        id: i64,
        user_id: i64,
        title: String,
        content: String,
        #[builder(default)] tags: String,
    ) -> Result<Self> {
        let now = Utc::now();
        let article = Self { id, user_id, title, content, tags, created_at: now, updated_at: now };
        article.validate()?;
        Ok(article)
    }
}

impl Resource for Article {
    const KIND: &'static str = "article";

    fn key_prefix() -> &'static str {
        "article"
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
        &["title", "content", "tags"]
    }

    fn list_fields() -> &'static [&'static str] {
        &["tags"]
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::validation("title must not be empty"));
        }
        if self.content.trim().is_empty() {
            return Err(Error::validation("content must not be empty"));
        }
        Ok(())
    }
}
