use bon::bon;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    resource::Resource,
};

/// Commit or pull-request reference backing a contribution.
///
/// The parent link is nullable: a git ref can be detached from its
/// contribution instead of deleted, which keeps the record around with
/// `contribution_id` set to `None`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GitRef {
    pub id: i64,

    /// Owning contribution; `None` once detached
    pub contribution_id: Option<i64>,

    /// Review state (e.g., "merged", "open")
    pub status: String,
    pub commit_id: String,
    pub pull_request_url: String,
    pub issue_url: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[bon]
impl GitRef {
    #[builder(finish_fn = create, on(String, into))]
    pub fn new(
        id: i64,
        contribution_id: i64,
        status: String,
        commit_id: String,
        pull_request_url: String,
        issue_url: Option<String>,
    ) -> Result<Self> {
        let now = Utc::now();
        let git_ref = Self {
            id,
            contribution_id: Some(contribution_id),
            status,
            commit_id,
            pull_request_url,
            issue_url,
            created_at: now,
            updated_at: now,
        };
        git_ref.validate()?;
        Ok(git_ref)
    }

    /// Whether this ref is still attached to a contribution
    pub fn is_attached(&self) -> bool {
        self.contribution_id.is_some()
    }
}

impl Resource for GitRef {
    const KIND: &'static str = "git_ref";

    fn key_prefix() -> &'static str {
        "git_ref"
    }

    fn parent_prefix() -> &'static str {
        "contribution"
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn parent_id(&self) -> Option<i64> {
        self.contribution_id
    }

    fn set_parent_id(&mut self, parent_id: Option<i64>) {
        self.contribution_id = parent_id;
    }

    fn writable_fields() -> &'static [&'static str] {
        &["status", "commit_id", "pull_request_url", "issue_url"]
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    fn validate(&self) -> Result<()> {
        if self.commit_id.trim().is_empty() {
            return Err(Error::validation("commit_id must not be empty"));
        }
        if self.pull_request_url.trim().is_empty() {
            return Err(Error::validation("pull_request_url must not be empty"));
        }
        Ok(())
    }
}
