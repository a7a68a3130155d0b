use bon::bon;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{error::Result, resource::Resource};

/// Public profile page data. Created empty alongside its user and filled
/// in later; image and resume fields hold upload URLs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    pub id: i64,

    /// Owning user
    pub user_id: i64,

    pub image_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,

    /// Section headings shown above each listing
    pub project_header: Option<String>,
    pub work_header: Option<String>,
    pub article_header: Option<String>,

    /// Uploaded resume URL
    pub resume: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[bon]
impl Profile {
    #[builder(finish_fn = create, on(String, into))]
    pub fn new(
        id: i64,
        user_id: i64,
        image_url: Option<String>,
        bio: Option<String>,
        location: Option<String>,
        project_header: Option<String>,
        work_header: Option<String>,
        article_header: Option<String>,
        resume: Option<String>,
    ) -> Result<Self> {
        let now = Utc::now();
        Ok(Self {
            id,
            user_id,
            image_url,
            bio,
            location,
            project_header,
            work_header,
            article_header,
            resume,
            created_at: now,
            updated_at: now,
        })
    }
}

impl Resource for Profile {
    const KIND: &'static str = "profile";

    fn key_prefix() -> &'static str {
        "profile"
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
            "image_url",
            "bio",
            "location",
            "project_header",
            "work_header",
            "article_header",
            "resume",
        ]
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_profile_is_valid() {
        let profile = Profile::builder().id(1).user_id(2).create().unwrap();
        assert_eq!(profile.parent_id(), Some(2));
        assert!(profile.bio.is_none());
    }
}
