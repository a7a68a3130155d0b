//! Cascading deletes.
//!
//! Each parent entity has an explicit delete function that removes its
//! children first. The chains are written out per entity instead of being
//! derived, so what a delete takes with it is visible at the call site.

use folio_storage::StorageBackend;
use folio_types::{
    Resource,
    entities::{Contribution, Profile, Project, User, Work},
    error::Result,
};

use crate::context::RepositoryContext;

/// Delete a project and its features
pub async fn delete_project<S>(repos: &RepositoryContext<S>, id: i64) -> Result<Project>
where
    S: StorageBackend + Clone,
{
    let features = repos.features.list_by_parent(id).await?;
    for feature in features {
        repos.features.delete(feature.id()).await?;
    }
    repos.projects.delete(id).await
}

/// Delete a work entry and its experiences
pub async fn delete_work<S>(repos: &RepositoryContext<S>, id: i64) -> Result<Work>
where
    S: StorageBackend + Clone,
{
    let experiences = repos.experiences.list_by_parent(id).await?;
    for experience in experiences {
        repos.experiences.delete(experience.id()).await?;
    }
    repos.works.delete(id).await
}

/// Delete a contribution and its git refs
pub async fn delete_contribution<S>(repos: &RepositoryContext<S>, id: i64) -> Result<Contribution>
where
    S: StorageBackend + Clone,
{
    let git_refs = repos.git_refs.list_by_parent(id).await?;
    for git_ref in git_refs {
        repos.git_refs.delete(git_ref.id()).await?;
    }
    repos.contributions.delete(id).await
}

/// Delete a profile, its contacts, and its services
pub async fn delete_profile<S>(repos: &RepositoryContext<S>, id: i64) -> Result<Profile>
where
    S: StorageBackend + Clone,
{
    let contacts = repos.contacts.list_by_parent(id).await?;
    for contact in contacts {
        repos.contacts.delete(contact.id()).await?;
    }
    let services = repos.services.list_by_parent(id).await?;
    for service in services {
        repos.services.delete(service.id()).await?;
    }
    repos.profiles.delete(id).await
}

/// Delete a user and everything reachable from it
pub async fn delete_user<S>(repos: &RepositoryContext<S>, id: i64) -> Result<User>
where
    S: StorageBackend + Clone,
{
    for profile in repos.profiles.list_by_parent(id).await? {
        delete_profile(repos, profile.id()).await?;
    }
    for project in repos.projects.list_by_parent(id).await? {
        delete_project(repos, project.id()).await?;
    }
    for work in repos.works.list_by_parent(id).await? {
        delete_work(repos, work.id()).await?;
    }
    for article in repos.articles.list_by_parent(id).await? {
        repos.articles.delete(article.id()).await?;
    }
    for contribution in repos.contributions.list_by_parent(id).await? {
        delete_contribution(repos, contribution.id()).await?;
    }
    repos.users.delete(id).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use folio_storage::MemoryBackend;
    use folio_types::entities::{Article, Contact, Feature, GitRef, Service};

    use super::*;

    fn repos() -> RepositoryContext<MemoryBackend> {
        RepositoryContext::new(MemoryBackend::new())
    }

    async fn seed_user(repos: &RepositoryContext<MemoryBackend>) -> i64 {
        let user = User::builder().id(1).name("u").email("u@example.com").create().unwrap();
        repos.users.create(user).await.unwrap();
        1
    }

    #[tokio::test]
    async fn test_project_delete_takes_features() {
        let repos = repos();
        let user_id = seed_user(&repos).await;

        let project = Project::builder()
            .id(10)
            .user_id(user_id)
            .title("t")
            .description("d")
            .create()
            .unwrap();
        repos.projects.create(project).await.unwrap();

        let feature =
            Feature::builder().id(11).project_id(10).name("f").description("d").create().unwrap();
        repos.features.create(feature).await.unwrap();

        delete_project(&repos, 10).await.unwrap();

        assert!(repos.projects.get(10).await.unwrap().is_none());
        assert!(repos.features.get(11).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_profile_delete_takes_contacts_and_services() {
        let repos = repos();
        let user_id = seed_user(&repos).await;

        let profile = Profile::builder().id(20).user_id(user_id).create().unwrap();
        repos.profiles.create(profile).await.unwrap();

        let contact = Contact::builder()
            .id(21)
            .profile_id(20)
            .name("GitHub")
            .url("https://github.com/u")
            .create()
            .unwrap();
        repos.contacts.create(contact).await.unwrap();

        let service =
            Service::builder().id(22).profile_id(20).title("s").description("d").create().unwrap();
        repos.services.create(service).await.unwrap();

        delete_profile(&repos, 20).await.unwrap();

        assert!(repos.profiles.get(20).await.unwrap().is_none());
        assert!(repos.contacts.get(21).await.unwrap().is_none());
        assert!(repos.services.get(22).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_user_delete_cascades_two_levels() {
        let repos = repos();
        let user_id = seed_user(&repos).await;

        let profile = Profile::builder().id(20).user_id(user_id).create().unwrap();
        repos.profiles.create(profile).await.unwrap();

        let project = Project::builder()
            .id(10)
            .user_id(user_id)
            .title("t")
            .description("d")
            .create()
            .unwrap();
        repos.projects.create(project).await.unwrap();

        let feature =
            Feature::builder().id(11).project_id(10).name("f").description("d").create().unwrap();
        repos.features.create(feature).await.unwrap();

        let article = Article::builder()
            .id(30)
            .user_id(user_id)
            .title("a")
            .content("c")
            .create()
            .unwrap();
        repos.articles.create(article).await.unwrap();

        let contribution = Contribution::builder()
            .id(40)
            .user_id(user_id)
            .name("c")
            .repo_url("https://example.com/repo")
            .create()
            .unwrap();
        repos.contributions.create(contribution).await.unwrap();

        let git_ref = GitRef::builder()
            .id(41)
            .contribution_id(40)
            .status("merged")
            .commit_id("abc")
            .pull_request_url("https://example.com/pr/1")
            .create()
            .unwrap();
        repos.git_refs.create(git_ref).await.unwrap();

        delete_user(&repos, user_id).await.unwrap();

        assert!(repos.users.get(user_id).await.unwrap().is_none());
        assert!(repos.profiles.get(20).await.unwrap().is_none());
        assert!(repos.projects.get(10).await.unwrap().is_none());
        assert!(repos.features.get(11).await.unwrap().is_none());
        assert!(repos.articles.get(30).await.unwrap().is_none());
        assert!(repos.contributions.get(40).await.unwrap().is_none());
        assert!(repos.git_refs.get(41).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_detached_git_ref_survives_contribution_delete() {
        let repos = repos();
        seed_user(&repos).await;

        let contribution = Contribution::builder()
            .id(40)
            .user_id(1)
            .name("c")
            .repo_url("https://example.com/repo")
            .create()
            .unwrap();
        repos.contributions.create(contribution).await.unwrap();

        let git_ref = GitRef::builder()
            .id(41)
            .contribution_id(40)
            .status("merged")
            .commit_id("abc")
            .pull_request_url("https://example.com/pr/1")
            .create()
            .unwrap();
        repos.git_refs.create(git_ref).await.unwrap();

        repos.git_refs.detach(41).await.unwrap();
        delete_contribution(&repos, 40).await.unwrap();

        assert!(repos.contributions.get(40).await.unwrap().is_none());
        assert!(repos.git_refs.get(41).await.unwrap().is_some());
    }
}
