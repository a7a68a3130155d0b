//! Ownership resolution.
//!
//! Every protected write resolves the record back to the user that owns it
//! before touching anything. Each entity spells out its own chain to the
//! owning user, so a wrong hop is a compile error in that entity's impl
//! rather than a silent hole.

use async_trait::async_trait;
use folio_storage::StorageBackend;
use folio_types::{
    Resource,
    entities::{
        Article, Contact, Contribution, Experience, Feature, GitRef, Profile, Project, Service,
        User, Work,
    },
    error::Result,
};

use crate::context::RepositoryContext;

/// An entity whose owning user can be resolved
///
/// `owner_id` returns `Ok(None)` when the record exists but has no owner,
/// which only happens for detached records. Callers treat `None` as
/// not-authorized.
#[async_trait]
pub trait Owned: Resource {
    /// Resolve the ID of the user that owns this record
    async fn owner_id<S>(&self, repos: &RepositoryContext<S>) -> Result<Option<i64>>
    where
        S: StorageBackend + Clone + Send + Sync;
}

#[async_trait]
impl Owned for User {
    async fn owner_id<S>(&self, _repos: &RepositoryContext<S>) -> Result<Option<i64>>
    where
        S: StorageBackend + Clone + Send + Sync,
    {
        Ok(Some(self.id))
    }
}

#[async_trait]
impl Owned for Profile {
    async fn owner_id<S>(&self, _repos: &RepositoryContext<S>) -> Result<Option<i64>>
    where
        S: StorageBackend + Clone + Send + Sync,
    {
        Ok(Some(self.user_id))
    }
}

#[async_trait]
impl Owned for Project {
    async fn owner_id<S>(&self, _repos: &RepositoryContext<S>) -> Result<Option<i64>>
    where
        S: StorageBackend + Clone + Send + Sync,
    {
        Ok(Some(self.user_id))
    }
}

#[async_trait]
impl Owned for Work {
    async fn owner_id<S>(&self, _repos: &RepositoryContext<S>) -> Result<Option<i64>>
    where
        S: StorageBackend + Clone + Send + Sync,
    {
        Ok(Some(self.user_id))
    }
}

#[async_trait]
impl Owned for Article {
    async fn owner_id<S>(&self, _repos: &RepositoryContext<S>) -> Result<Option<i64>>
    where
        S: StorageBackend + Clone + Send + Sync,
    {
        Ok(Some(self.user_id))
    }
}

#[async_trait]
impl Owned for Contribution {
    async fn owner_id<S>(&self, _repos: &RepositoryContext<S>) -> Result<Option<i64>>
    where
        S: StorageBackend + Clone + Send + Sync,
    {
        Ok(Some(self.user_id))
    }
}

#[async_trait]
impl Owned for Feature {
    async fn owner_id<S>(&self, repos: &RepositoryContext<S>) -> Result<Option<i64>>
    where
        S: StorageBackend + Clone + Send + Sync,
    {
        let project = repos.projects.require(self.project_id).await?;
        Ok(Some(project.user_id))
    }
}

#[async_trait]
impl Owned for Experience {
    async fn owner_id<S>(&self, repos: &RepositoryContext<S>) -> Result<Option<i64>>
    where
        S: StorageBackend + Clone + Send + Sync,
    {
        let work = repos.works.require(self.work_id).await?;
        Ok(Some(work.user_id))
    }
}

#[async_trait]
impl Owned for GitRef {
    async fn owner_id<S>(&self, repos: &RepositoryContext<S>) -> Result<Option<i64>>
    where
        S: StorageBackend + Clone + Send + Sync,
    {
        // A detached git ref belongs to nobody until it is re-attached
        let Some(contribution_id) = self.contribution_id else {
            return Ok(None);
        };
        let contribution = repos.contributions.require(contribution_id).await?;
        Ok(Some(contribution.user_id))
    }
}

#[async_trait]
impl Owned for Contact {
    async fn owner_id<S>(&self, repos: &RepositoryContext<S>) -> Result<Option<i64>>
    where
        S: StorageBackend + Clone + Send + Sync,
    {
        let profile = repos.profiles.require(self.profile_id).await?;
        Ok(Some(profile.user_id))
    }
}

#[async_trait]
impl Owned for Service {
    async fn owner_id<S>(&self, repos: &RepositoryContext<S>) -> Result<Option<i64>>
    where
        S: StorageBackend + Clone + Send + Sync,
    {
        let profile = repos.profiles.require(self.profile_id).await?;
        Ok(Some(profile.user_id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use folio_storage::MemoryBackend;

    use super::*;

    fn repos() -> RepositoryContext<MemoryBackend> {
        RepositoryContext::new(MemoryBackend::new())
    }

    #[tokio::test]
    async fn test_user_owns_itself() {
        let repos = repos();
        let user = User::builder().id(1).name("u").email("u@example.com").create().unwrap();
        assert_eq!(user.owner_id(&repos).await.unwrap(), Some(1));
    }

    #[tokio::test]
    async fn test_feature_resolves_through_project() {
        let repos = repos();
        let project = Project::builder()
            .id(10)
            .user_id(1)
            .title("t")
            .description("d")
            .create()
            .unwrap();
        repos.projects.create(project).await.unwrap();

        let feature =
            Feature::builder().id(20).project_id(10).name("f").description("d").create().unwrap();
        assert_eq!(feature.owner_id(&repos).await.unwrap(), Some(1));
    }

    #[tokio::test]
    async fn test_feature_with_missing_project_is_an_error() {
        let repos = repos();
        let feature =
            Feature::builder().id(20).project_id(99).name("f").description("d").create().unwrap();
        assert!(feature.owner_id(&repos).await.is_err());
    }

    #[tokio::test]
    async fn test_detached_git_ref_has_no_owner() {
        let repos = repos();
        let mut git_ref = GitRef::builder()
            .id(30)
            .contribution_id(5)
            .status("open")
            .commit_id("abc")
            .pull_request_url("https://example.com/pr/1")
            .create()
            .unwrap();
        git_ref.contribution_id = None;

        assert_eq!(git_ref.owner_id(&repos).await.unwrap(), None);
    }
}
