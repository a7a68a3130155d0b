//! Backend selection.
//!
//! One concrete [`Backend`] enum keeps the rest of the stack generic over a
//! single `Clone` storage type instead of trait objects.

use std::{ops::RangeBounds, path::PathBuf};

use async_trait::async_trait;
use bytes::Bytes;

use crate::{
    backend::{KeyValue, StorageBackend, StorageError, StorageResult, Transaction},
    memory::MemoryBackend,
    redb::RedbBackend,
};

/// Which backend to open, and where
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// Volatile in-memory store (for development and testing)
    Memory,
    /// Persistent redb database at the given path
    File { path: PathBuf },
}

impl StorageConfig {
    pub fn memory() -> Self {
        Self::Memory
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File { path: path.into() }
    }
}

/// The concrete backend the server runs with
#[derive(Clone)]
pub enum Backend {
    /// In-memory backend
    Memory(MemoryBackend),
    /// File backend for production
    File(RedbBackend),
}

impl Backend {
    /// Creates a new in-memory backend, primarily for testing.
    #[must_use]
    pub fn memory() -> Self {
        Backend::Memory(MemoryBackend::new())
    }

    /// Backend name for logging
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Backend::Memory(_) => "memory",
            Backend::File(_) => "file",
        }
    }
}

/// Forwards one trait method to whichever variant is live
macro_rules! delegate_storage {
    ($self:ident, $method:ident ( $($arg:expr),* )) => {
        match $self {
            Backend::Memory(__backend) => __backend.$method($($arg),*).await,
            Backend::File(__backend) => __backend.$method($($arg),*).await,
        }
    };
}

#[async_trait]
impl StorageBackend for Backend {
    async fn get(&self, key: &[u8]) -> StorageResult<Option<Bytes>> {
        delegate_storage!(self, get(key))
    }

    async fn set(&self, key: Vec<u8>, value: Vec<u8>) -> StorageResult<()> {
        delegate_storage!(self, set(key, value))
    }

    async fn delete(&self, key: &[u8]) -> StorageResult<()> {
        delegate_storage!(self, delete(key))
    }

    async fn get_range<R>(&self, range: R) -> StorageResult<Vec<KeyValue>>
    where
        R: RangeBounds<Vec<u8>> + Send,
    {
        delegate_storage!(self, get_range(range))
    }

    async fn clear_range<R>(&self, range: R) -> StorageResult<()>
    where
        R: RangeBounds<Vec<u8>> + Send,
    {
        delegate_storage!(self, clear_range(range))
    }

    async fn set_with_ttl(
        &self,
        key: Vec<u8>,
        value: Vec<u8>,
        ttl_seconds: u64,
    ) -> StorageResult<()> {
        delegate_storage!(self, set_with_ttl(key, value, ttl_seconds))
    }

    async fn transaction(&self) -> StorageResult<Box<dyn Transaction>> {
        delegate_storage!(self, transaction())
    }

    async fn health_check(&self) -> StorageResult<()> {
        delegate_storage!(self, health_check())
    }
}

/// Open the configured backend, creating parent directories for file
/// storage as needed
pub fn create_storage_backend(config: &StorageConfig) -> StorageResult<Backend> {
    match config {
        StorageConfig::Memory => {
            tracing::info!("using in-memory storage backend");
            Ok(Backend::memory())
        },
        StorageConfig::File { path } => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StorageError::Storage(e.to_string()))?;
            }
            tracing::info!(path = %path.display(), "using file storage backend");
            Ok(Backend::File(RedbBackend::open(path)?))
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_backend_opens_and_stores() {
        let backend = create_storage_backend(&StorageConfig::memory()).unwrap();
        assert_eq!(backend.name(), "memory");

        backend.set(b"smoke".to_vec(), b"1".to_vec()).await.unwrap();
        assert!(backend.get(b"smoke").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_file_backend_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/folio.redb");

        let backend = create_storage_backend(&StorageConfig::file(&path)).unwrap();
        assert_eq!(backend.name(), "file");

        backend.set(b"smoke".to_vec(), b"1".to_vec()).await.unwrap();
        assert!(backend.get(b"smoke").await.unwrap().is_some());
    }
}
