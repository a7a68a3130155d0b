//! Repository context.
//!
//! One value bundling a repository per entity over a shared storage backend,
//! so handlers and ownership checks take a single argument instead of a
//! dozen repositories.

use folio_storage::StorageBackend;
use folio_types::{
    entities::{
        Article, Contact, Contribution, Experience, Feature, GitRef, Profile, Project, Service,
        User, Work,
    },
    error::{Error, Result},
};

use crate::repository::{ResourceRepository, RevocationRepository};

/// All repositories over one storage backend
pub struct RepositoryContext<S: StorageBackend + Clone> {
    storage: S,
    pub users: ResourceRepository<S, User>,
    pub profiles: ResourceRepository<S, Profile>,
    pub projects: ResourceRepository<S, Project>,
    pub features: ResourceRepository<S, Feature>,
    pub works: ResourceRepository<S, Work>,
    pub experiences: ResourceRepository<S, Experience>,
    pub articles: ResourceRepository<S, Article>,
    pub contributions: ResourceRepository<S, Contribution>,
    pub git_refs: ResourceRepository<S, GitRef>,
    pub contacts: ResourceRepository<S, Contact>,
    pub services: ResourceRepository<S, Service>,
    pub revocations: RevocationRepository<S>,
}

impl<S: StorageBackend + Clone> RepositoryContext<S> {
    /// Create a context with every repository sharing the given backend
    pub fn new(storage: S) -> Self {
        Self {
            storage: storage.clone(),
            users: ResourceRepository::new(storage.clone()),
            profiles: ResourceRepository::new(storage.clone()),
            projects: ResourceRepository::new(storage.clone()),
            features: ResourceRepository::new(storage.clone()),
            works: ResourceRepository::new(storage.clone()),
            experiences: ResourceRepository::new(storage.clone()),
            articles: ResourceRepository::new(storage.clone()),
            contributions: ResourceRepository::new(storage.clone()),
            git_refs: ResourceRepository::new(storage.clone()),
            contacts: ResourceRepository::new(storage.clone()),
            services: ResourceRepository::new(storage.clone()),
            revocations: RevocationRepository::new(storage),
        }
    }

    /// Create a user together with their empty profile in one transaction
    ///
    /// Registration must never leave a user without a profile, so both
    /// records and their indexes land in a single commit.
    pub async fn create_user_with_profile(
        &self,
        user: User,
        profile: Profile,
    ) -> Result<(User, Profile)> {
        let mut txn = self
            .storage
            .transaction()
            .await
            .map_err(|e| Error::storage(format!("Failed to start transaction: {e}")))?;

        self.users.stage_create(&user, txn.as_mut()).await?;
        self.profiles.stage_create(&profile, txn.as_mut()).await?;

        txn.commit()
            .await
            .map_err(|e| Error::storage(format!("Failed to commit registration: {e}")))?;

        Ok((user, profile))
    }
}
