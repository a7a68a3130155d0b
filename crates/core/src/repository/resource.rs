use std::marker::PhantomData;

use folio_storage::{StorageBackend, Transaction};
use folio_types::{
    Resource, delimited,
    error::{Error, Result},
};
use serde_json::Value;

/// Generic repository for entities that implement [`Resource`]
///
/// Provides CRUD operations with consistent key schema:
/// - `{prefix}:{id}` → serialized entity
/// - `{prefix}:{parent_prefix}:{parent_id}:{id}` → entity ID (for listing children)
/// - `{prefix}:{unique_prefix}:{value}` → entity ID (for unique field lookup)
pub struct ResourceRepository<S: StorageBackend, T: Resource> {
    storage: S,
    _phantom: PhantomData<T>,
}

impl<S: StorageBackend, T: Resource> ResourceRepository<S, T> {
    /// Create a new repository instance
    pub fn new(storage: S) -> Self {
        Self { storage, _phantom: PhantomData }
    }

    /// Generate primary key for an entity by ID
    fn record_key(id: i64) -> Vec<u8> {
        format!("{}:{id}", T::key_prefix()).into_bytes()
    }

    /// Generate key for the parent listing index
    fn parent_index_key(parent_id: i64, id: i64) -> Vec<u8> {
        format!("{}:{}:{parent_id}:{id}", T::key_prefix(), T::parent_prefix()).into_bytes()
    }

    /// Generate key for the unique field index
    fn unique_index_key(unique_prefix: &str, value: &str) -> Vec<u8> {
        format!("{}:{unique_prefix}:{value}", T::key_prefix()).into_bytes()
    }

    async fn unique_holder(&self, value: &str) -> Result<Option<i64>> {
        let Some(prefix) = T::unique_prefix() else {
            return Ok(None);
        };
        let data = self
            .storage
            .get(&Self::unique_index_key(prefix, value))
            .await
            .map_err(|e| Error::storage(format!("Failed to check unique index: {e}")))?;
        match data {
            Some(bytes) => Ok(Some(super::parse_i64_id(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Stage the writes for a new entity into an open transaction
    ///
    /// Validates the entity and checks the unique index, then stages the
    /// primary record and secondary indexes. The caller commits, so several
    /// entities can be created in one transaction.
    pub async fn stage_create(&self, entity: &T, txn: &mut dyn Transaction) -> Result<()> {
        entity.validate()?;

        if let (Some(_), Some(value)) = (T::unique_prefix(), entity.unique_value()) {
            if self.unique_holder(&value).await?.is_some() {
                return Err(Error::already_exists(format!("{} already exists", T::KIND)));
            }
        }

        let data = serde_json::to_vec(entity)
            .map_err(|e| Error::internal(format!("Failed to serialize {}: {e}", T::KIND)))?;

        txn.set(Self::record_key(entity.id()), data);
        if let Some(parent_id) = entity.parent_id() {
            txn.set(
                Self::parent_index_key(parent_id, entity.id()),
                entity.id().to_le_bytes().to_vec(),
            );
        }
        if let (Some(prefix), Some(value)) = (T::unique_prefix(), entity.unique_value()) {
            txn.set(Self::unique_index_key(prefix, &value), entity.id().to_le_bytes().to_vec());
        }
        Ok(())
    }

    /// Store a new entity
    ///
    /// Creates the primary record and secondary indexes atomically. Fails if
    /// another record already holds the entity's unique field value.
    pub async fn create(&self, entity: T) -> Result<T> {
        let mut txn = self
            .storage
            .transaction()
            .await
            .map_err(|e| Error::storage(format!("Failed to start transaction: {e}")))?;

        self.stage_create(&entity, txn.as_mut()).await?;

        txn.commit()
            .await
            .map_err(|e| Error::storage(format!("Failed to commit {} creation: {e}", T::KIND)))?;

        Ok(entity)
    }

    /// Get an entity by its primary ID
    pub async fn get(&self, id: i64) -> Result<Option<T>> {
        let data = self
            .storage
            .get(&Self::record_key(id))
            .await
            .map_err(|e| Error::storage(format!("Failed to get {}: {e}", T::KIND)))?;

        match data {
            Some(bytes) => {
                let entity: T = serde_json::from_slice(&bytes).map_err(|e| {
                    Error::internal(format!("Failed to deserialize {}: {e}", T::KIND))
                })?;
                Ok(Some(entity))
            },
            None => Ok(None),
        }
    }

    /// Get an entity by ID, failing with not-found if it is absent
    pub async fn require(&self, id: i64) -> Result<T> {
        self.get(id).await?.ok_or_else(|| Error::not_found(format!("{} not found", T::KIND)))
    }

    /// Look up an entity by its unique field value
    pub async fn find_by_unique(&self, value: &str) -> Result<Option<T>> {
        match self.unique_holder(value).await? {
            Some(id) => self.get(id).await,
            None => Ok(None),
        }
    }

    /// List all entities under a given parent, in the entity's listing order
    pub async fn list_by_parent(&self, parent_id: i64) -> Result<Vec<T>> {
        let start =
            format!("{}:{}:{parent_id}:", T::key_prefix(), T::parent_prefix()).into_bytes();
        let end = format!("{}:{}:{parent_id}~", T::key_prefix(), T::parent_prefix()).into_bytes();

        let kvs = self
            .storage
            .get_range(start..end)
            .await
            .map_err(|e| Error::storage(format!("Failed to list {}: {e}", T::KIND)))?;

        let mut entities = Vec::new();
        for kv in kvs {
            let Ok(id) = super::parse_i64_id(&kv.value) else { continue };
            if let Some(entity) = self.get(id).await? {
                entities.push(entity);
            }
        }

        T::sort_listing(&mut entities);
        Ok(entities)
    }

    /// Encode a patched list field from the array shape the API serves
    fn encode_list_field(key: &str, value: &Value) -> Result<Value> {
        let Some(items) = value.as_array() else {
            return Err(Error::validation(format!("{key} must be an array of strings")));
        };
        let mut strings = Vec::with_capacity(items.len());
        for item in items {
            let Some(s) = item.as_str() else {
                return Err(Error::validation(format!("{key} must be an array of strings")));
            };
            strings.push(s);
        }
        Ok(Value::String(delimited::join(&strings)?))
    }

    /// Apply a partial update to an entity
    ///
    /// Only fields named in [`Resource::writable_fields`] may appear; any
    /// other key fails the whole request. List fields arrive in the same
    /// array shape reads return and are re-encoded before the merge. The
    /// merged entity is re-validated before being written, and secondary
    /// indexes are moved if the unique field or parent changed.
    pub async fn patch(&self, id: i64, fields: &serde_json::Map<String, Value>) -> Result<T> {
        let current = self.require(id).await?;

        let mut fields = fields.clone();
        for (key, field_value) in fields.iter_mut() {
            if !T::writable_fields().contains(&key.as_str()) {
                return Err(Error::unknown_field(key));
            }
            if T::list_fields().contains(&key.as_str()) {
                *field_value = Self::encode_list_field(key, field_value)?;
            }
        }

        let old_unique = current.unique_value();
        let old_parent = current.parent_id();

        let mut value = serde_json::to_value(&current)
            .map_err(|e| Error::internal(format!("Failed to serialize {}: {e}", T::KIND)))?;
        let Some(object) = value.as_object_mut() else {
            return Err(Error::internal(format!("{} is not a JSON object", T::KIND)));
        };
        for (key, field_value) in fields {
            object.insert(key, field_value);
        }

        let mut updated: T = serde_json::from_value(value)
            .map_err(|e| Error::validation(format!("invalid field value: {e}")))?;
        updated.validate()?;
        updated.touch();

        let new_unique = updated.unique_value();
        if new_unique != old_unique {
            if let Some(value) = new_unique.as_deref() {
                if let Some(holder) = self.unique_holder(value).await? {
                    if holder != id {
                        return Err(Error::already_exists(format!("{} already exists", T::KIND)));
                    }
                }
            }
        }

        let data = serde_json::to_vec(&updated)
            .map_err(|e| Error::internal(format!("Failed to serialize {}: {e}", T::KIND)))?;

        let mut txn = self
            .storage
            .transaction()
            .await
            .map_err(|e| Error::storage(format!("Failed to start transaction: {e}")))?;

        txn.set(Self::record_key(id), data);

        if new_unique != old_unique {
            if let Some(prefix) = T::unique_prefix() {
                if let Some(old) = old_unique.as_deref() {
                    txn.delete(Self::unique_index_key(prefix, old));
                }
                if let Some(new) = new_unique.as_deref() {
                    txn.set(Self::unique_index_key(prefix, new), id.to_le_bytes().to_vec());
                }
            }
        }

        let new_parent = updated.parent_id();
        if new_parent != old_parent {
            if let Some(old) = old_parent {
                txn.delete(Self::parent_index_key(old, id));
            }
            if let Some(new) = new_parent {
                txn.set(Self::parent_index_key(new, id), id.to_le_bytes().to_vec());
            }
        }

        txn.commit()
            .await
            .map_err(|e| Error::storage(format!("Failed to commit {} update: {e}", T::KIND)))?;

        Ok(updated)
    }

    /// Overwrite an entity's stored record in place
    ///
    /// For fields outside the patchable set, such as password hashes. The
    /// caller must not change the id, unique value, or parent; indexes are
    /// left untouched.
    pub async fn put(&self, mut entity: T) -> Result<T> {
        entity.validate()?;
        entity.touch();

        let data = serde_json::to_vec(&entity)
            .map_err(|e| Error::internal(format!("Failed to serialize {}: {e}", T::KIND)))?;

        self.storage
            .set(Self::record_key(entity.id()), data)
            .await
            .map_err(|e| Error::storage(format!("Failed to store {}: {e}", T::KIND)))?;

        Ok(entity)
    }

    /// Delete an entity and its indexes, returning the deleted record
    pub async fn delete(&self, id: i64) -> Result<T> {
        let current = self.require(id).await?;

        let mut txn = self
            .storage
            .transaction()
            .await
            .map_err(|e| Error::storage(format!("Failed to start transaction: {e}")))?;

        txn.delete(Self::record_key(id));
        if let Some(parent_id) = current.parent_id() {
            txn.delete(Self::parent_index_key(parent_id, id));
        }
        if let (Some(prefix), Some(value)) = (T::unique_prefix(), current.unique_value()) {
            txn.delete(Self::unique_index_key(prefix, &value));
        }

        txn.commit()
            .await
            .map_err(|e| Error::storage(format!("Failed to commit {} deletion: {e}", T::KIND)))?;

        Ok(current)
    }

    /// Detach an entity from its parent without deleting it
    ///
    /// Removes the listing index entry and clears the parent reference.
    /// No-op for an entity that is already detached.
    pub async fn detach(&self, id: i64) -> Result<T> {
        let mut current = self.require(id).await?;

        let Some(parent_id) = current.parent_id() else {
            return Ok(current);
        };

        current.set_parent_id(None);
        current.touch();

        let data = serde_json::to_vec(&current)
            .map_err(|e| Error::internal(format!("Failed to serialize {}: {e}", T::KIND)))?;

        let mut txn = self
            .storage
            .transaction()
            .await
            .map_err(|e| Error::storage(format!("Failed to start transaction: {e}")))?;

        txn.delete(Self::parent_index_key(parent_id, id));
        txn.set(Self::record_key(id), data);

        txn.commit()
            .await
            .map_err(|e| Error::storage(format!("Failed to commit {} detach: {e}", T::KIND)))?;

        Ok(current)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use folio_storage::MemoryBackend;
    use folio_types::entities::{Feature, GitRef, User};

    use super::*;

    fn users(storage: &MemoryBackend) -> ResourceRepository<MemoryBackend, User> {
        ResourceRepository::new(storage.clone())
    }

    fn features(storage: &MemoryBackend) -> ResourceRepository<MemoryBackend, Feature> {
        ResourceRepository::new(storage.clone())
    }

    fn test_user(id: i64, email: &str) -> User {
        User::builder().id(id).name("Test User").email(email).create().unwrap()
    }

    fn test_feature(id: i64, project_id: i64, name: &str) -> Feature {
        Feature::builder()
            .id(id)
            .project_id(project_id)
            .name(name)
            .description("a feature")
            .create()
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let storage = MemoryBackend::new();
        let repo = users(&storage);

        repo.create(test_user(1, "a@example.com")).await.unwrap();

        let fetched = repo.get(1).await.unwrap().unwrap();
        assert_eq!(fetched.email, "a@example.com");
        assert!(repo.get(2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unique_index_lookup_and_conflict() {
        let storage = MemoryBackend::new();
        let repo = users(&storage);

        repo.create(test_user(1, "a@example.com")).await.unwrap();

        let found = repo.find_by_unique("a@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, 1);
        assert!(repo.find_by_unique("b@example.com").await.unwrap().is_none());

        let err = repo.create(test_user(2, "a@example.com")).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_list_by_parent() {
        let storage = MemoryBackend::new();
        let repo = features(&storage);

        repo.create(test_feature(10, 1, "first")).await.unwrap();
        repo.create(test_feature(11, 1, "second")).await.unwrap();
        repo.create(test_feature(12, 2, "other project")).await.unwrap();

        let listed = repo.list_by_parent(1).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().all(|f| f.project_id == 1));

        assert_eq!(repo.list_by_parent(2).await.unwrap().len(), 1);
        assert!(repo.list_by_parent(3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_patch_writable_field() {
        let storage = MemoryBackend::new();
        let repo = features(&storage);

        repo.create(test_feature(10, 1, "old name")).await.unwrap();

        let mut fields = serde_json::Map::new();
        fields.insert("name".to_string(), Value::String("new name".to_string()));

        let updated = repo.patch(10, &fields).await.unwrap();
        assert_eq!(updated.name, "new name");
        assert!(updated.updated_at >= updated.created_at);

        let fetched = repo.get(10).await.unwrap().unwrap();
        assert_eq!(fetched.name, "new name");
    }

    #[tokio::test]
    async fn test_put_overwrites_record() {
        let storage = MemoryBackend::new();
        let repo = users(&storage);

        repo.create(test_user(1, "a@example.com")).await.unwrap();

        let mut user = repo.require(1).await.unwrap();
        user.password_hash = Some("$argon2id$rotated".to_string());
        repo.put(user).await.unwrap();

        let fetched = repo.require(1).await.unwrap();
        assert_eq!(fetched.password_hash.as_deref(), Some("$argon2id$rotated"));
        // The unique index still resolves
        assert_eq!(repo.find_by_unique("a@example.com").await.unwrap().unwrap().id, 1);
    }

    #[tokio::test]
    async fn test_patch_rejects_unknown_field() {
        let storage = MemoryBackend::new();
        let repo = features(&storage);

        repo.create(test_feature(10, 1, "name")).await.unwrap();

        let mut fields = serde_json::Map::new();
        fields.insert("nonexistent".to_string(), Value::String("x".to_string()));

        let err = repo.patch(10, &fields).await.unwrap_err();
        assert!(err.to_string().contains("unknown field: nonexistent"));

        // Nothing was written
        assert_eq!(repo.get(10).await.unwrap().unwrap().name, "name");
    }

    #[tokio::test]
    async fn test_patch_list_field_takes_the_array_shape() {
        use folio_types::entities::Project;

        let storage = MemoryBackend::new();
        let repo: ResourceRepository<MemoryBackend, Project> =
            ResourceRepository::new(storage.clone());

        let project = Project::builder()
            .id(30)
            .user_id(1)
            .title("site")
            .description("portfolio site")
            .skills("rust")
            .create()
            .unwrap();
        repo.create(project).await.unwrap();

        let mut fields = serde_json::Map::new();
        fields.insert("skills".to_string(), serde_json::json!(["rust", "axum"]));

        let updated = repo.patch(30, &fields).await.unwrap();
        assert_eq!(updated.skills, "rust::axum");
    }

    #[tokio::test]
    async fn test_patch_list_field_rejects_non_array_shapes() {
        use folio_types::entities::Project;

        let storage = MemoryBackend::new();
        let repo: ResourceRepository<MemoryBackend, Project> =
            ResourceRepository::new(storage.clone());

        let project = Project::builder()
            .id(31)
            .user_id(1)
            .title("site")
            .description("portfolio site")
            .skills("rust")
            .create()
            .unwrap();
        repo.create(project).await.unwrap();

        let mut fields = serde_json::Map::new();
        fields.insert("skills".to_string(), Value::String("rust::axum".to_string()));
        let err = repo.patch(31, &fields).await.unwrap_err();
        assert_eq!(err.status_code(), 400);

        fields.insert("skills".to_string(), serde_json::json!(["ok", "bad::item"]));
        assert!(repo.patch(31, &fields).await.is_err());

        // Nothing was written
        assert_eq!(repo.require(31).await.unwrap().skills, "rust");
    }

    #[tokio::test]
    async fn test_patch_moves_unique_index() {
        let storage = MemoryBackend::new();
        let repo = users(&storage);

        repo.create(test_user(1, "old@example.com")).await.unwrap();

        let mut fields = serde_json::Map::new();
        fields.insert("email".to_string(), Value::String("new@example.com".to_string()));
        repo.patch(1, &fields).await.unwrap();

        assert!(repo.find_by_unique("old@example.com").await.unwrap().is_none());
        assert_eq!(repo.find_by_unique("new@example.com").await.unwrap().unwrap().id, 1);
    }

    #[tokio::test]
    async fn test_patch_rejects_taken_unique_value() {
        let storage = MemoryBackend::new();
        let repo = users(&storage);

        repo.create(test_user(1, "a@example.com")).await.unwrap();
        repo.create(test_user(2, "b@example.com")).await.unwrap();

        let mut fields = serde_json::Map::new();
        fields.insert("email".to_string(), Value::String("a@example.com".to_string()));

        assert!(repo.patch(2, &fields).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_removes_record_and_indexes() {
        let storage = MemoryBackend::new();
        let repo = features(&storage);

        repo.create(test_feature(10, 1, "name")).await.unwrap();
        repo.delete(10).await.unwrap();

        assert!(repo.get(10).await.unwrap().is_none());
        assert!(repo.list_by_parent(1).await.unwrap().is_empty());

        let err = repo.delete(10).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_detach_clears_parent_but_keeps_record() {
        let storage = MemoryBackend::new();
        let repo: ResourceRepository<MemoryBackend, GitRef> =
            ResourceRepository::new(storage.clone());

        let git_ref = GitRef::builder()
            .id(20)
            .contribution_id(5)
            .status("merged")
            .commit_id("abc123")
            .pull_request_url("https://example.com/pr/1")
            .create()
            .unwrap();
        repo.create(git_ref).await.unwrap();

        let detached = repo.detach(20).await.unwrap();
        assert!(detached.contribution_id.is_none());

        assert!(repo.list_by_parent(5).await.unwrap().is_empty());
        assert!(repo.get(20).await.unwrap().is_some());

        // Detaching again is a no-op
        repo.detach(20).await.unwrap();
    }
}
