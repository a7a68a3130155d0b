//! In-memory storage backend.
//!
//! Thread-safe ordered map with lazy TTL expiry and buffered transactions.
//! Used for development, tests, and `--dev-mode`.

use std::{
    collections::BTreeMap,
    ops::RangeBounds,
    sync::Arc,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use crate::backend::{KeyValue, StorageBackend, StorageResult, Transaction};

#[derive(Debug, Clone)]
struct Entry {
    value: Bytes,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

/// Ordered in-memory key-value store
#[derive(Clone, Default)]
pub struct MemoryBackend {
    data: Arc<RwLock<BTreeMap<Vec<u8>, Entry>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn get(&self, key: &[u8]) -> StorageResult<Option<Bytes>> {
        let data = self.data.read().await;
        match data.get(key) {
            Some(entry) if !entry.is_expired() => Ok(Some(entry.value.clone())),
            // Expired entries are dropped lazily on the next write
            _ => Ok(None),
        }
    }

    async fn set(&self, key: Vec<u8>, value: Vec<u8>) -> StorageResult<()> {
        let mut data = self.data.write().await;
        data.insert(key, Entry { value: Bytes::from(value), expires_at: None });
        Ok(())
    }

    async fn delete(&self, key: &[u8]) -> StorageResult<()> {
        let mut data = self.data.write().await;
        data.remove(key);
        Ok(())
    }

    async fn get_range<R>(&self, range: R) -> StorageResult<Vec<KeyValue>>
    where
        R: RangeBounds<Vec<u8>> + Send,
    {
        let data = self.data.read().await;
        Ok(data
            .range((range.start_bound().cloned(), range.end_bound().cloned()))
            .filter(|(_, entry)| !entry.is_expired())
            .map(|(key, entry)| KeyValue {
                key: Bytes::from(key.clone()),
                value: entry.value.clone(),
            })
            .collect())
    }

    async fn clear_range<R>(&self, range: R) -> StorageResult<()>
    where
        R: RangeBounds<Vec<u8>> + Send,
    {
        let mut data = self.data.write().await;
        let keys: Vec<Vec<u8>> = data
            .range::<Vec<u8>, _>((range.start_bound(), range.end_bound()))
            .map(|(key, _)| key.clone())
            .collect();
        for key in keys {
            data.remove(&key);
        }
        Ok(())
    }

    async fn set_with_ttl(
        &self,
        key: Vec<u8>,
        value: Vec<u8>,
        ttl_seconds: u64,
    ) -> StorageResult<()> {
        let mut data = self.data.write().await;
        data.insert(
            key,
            Entry {
                value: Bytes::from(value),
                expires_at: Some(Instant::now() + Duration::from_secs(ttl_seconds)),
            },
        );
        Ok(())
    }

    async fn transaction(&self) -> StorageResult<Box<dyn Transaction>> {
        Ok(Box::new(MemoryTransaction { backend: self.clone(), ops: Vec::new() }))
    }

    async fn health_check(&self) -> StorageResult<()> {
        Ok(())
    }
}

enum Op {
    Set(Vec<u8>, Vec<u8>),
    Delete(Vec<u8>),
}

/// Buffered transaction over [`MemoryBackend`]
///
/// All staged operations apply under a single write lock on commit, so
/// concurrent readers never observe a partial commit.
struct MemoryTransaction {
    backend: MemoryBackend,
    ops: Vec<Op>,
}

#[async_trait]
impl Transaction for MemoryTransaction {
    async fn get(&self, key: &[u8]) -> StorageResult<Option<Bytes>> {
        // Last staged op for the key wins
        for op in self.ops.iter().rev() {
            match op {
                Op::Set(k, v) if k.as_slice() == key => return Ok(Some(Bytes::from(v.clone()))),
                Op::Delete(k) if k.as_slice() == key => return Ok(None),
                _ => {},
            }
        }
        self.backend.get(key).await
    }

    fn set(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.ops.push(Op::Set(key, value));
    }

    fn delete(&mut self, key: Vec<u8>) {
        self.ops.push(Op::Delete(key));
    }

    async fn commit(self: Box<Self>) -> StorageResult<()> {
        let mut data = self.backend.data.write().await;
        data.retain(|_, entry| !entry.is_expired());
        for op in self.ops {
            match op {
                Op::Set(key, value) => {
                    data.insert(key, Entry { value: Bytes::from(value), expires_at: None });
                },
                Op::Delete(key) => {
                    data.remove(&key);
                },
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_set_get_delete() {
        let backend = MemoryBackend::new();

        backend.set(b"user:100".to_vec(), b"alice".to_vec()).await.unwrap();
        assert_eq!(backend.get(b"user:100").await.unwrap(), Some(Bytes::from("alice")));

        backend.delete(b"user:100").await.unwrap();
        assert_eq!(backend.get(b"user:100").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_ranges_are_ordered_and_end_exclusive() {
        let backend = MemoryBackend::new();

        for key in ["proj:1", "proj:2", "proj:3"] {
            backend.set(key.as_bytes().to_vec(), b"r".to_vec()).await.unwrap();
        }

        let hits = backend.get_range(b"proj:1".to_vec()..b"proj:3".to_vec()).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].key, Bytes::from("proj:1"));
        assert_eq!(hits[1].key, Bytes::from("proj:2"));
    }

    #[tokio::test]
    async fn test_clear_range() {
        let backend = MemoryBackend::new();

        backend.set(b"p:1".to_vec(), b"1".to_vec()).await.unwrap();
        backend.set(b"p:2".to_vec(), b"2".to_vec()).await.unwrap();
        backend.set(b"q:1".to_vec(), b"3".to_vec()).await.unwrap();

        backend.clear_range(b"p:".to_vec()..b"p~".to_vec()).await.unwrap();

        assert_eq!(backend.get(b"p:1").await.unwrap(), None);
        assert_eq!(backend.get(b"p:2").await.unwrap(), None);
        assert!(backend.get(b"q:1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_ttl_entries_expire() {
        let backend = MemoryBackend::new();

        backend.set_with_ttl(b"otp:1".to_vec(), b"123456".to_vec(), 1).await.unwrap();
        assert!(backend.get(b"otp:1").await.unwrap().is_some());

        tokio::time::sleep(Duration::from_secs(2)).await;

        assert_eq!(backend.get(b"otp:1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_expired_entries_absent_from_ranges() {
        let backend = MemoryBackend::new();

        backend.set_with_ttl(b"otp:a".to_vec(), b"1".to_vec(), 1).await.unwrap();
        backend.set(b"otp:b".to_vec(), b"2".to_vec()).await.unwrap();

        tokio::time::sleep(Duration::from_secs(2)).await;

        let range = backend.get_range(b"otp:".to_vec()..b"otp~".to_vec()).await.unwrap();
        assert_eq!(range.len(), 1);
        assert_eq!(range[0].key, Bytes::from("otp:b"));
    }

    #[tokio::test]
    async fn test_transaction_applies_atomically() {
        let backend = MemoryBackend::new();

        backend.set(b"old".to_vec(), b"stale".to_vec()).await.unwrap();

        let mut txn = backend.transaction().await.unwrap();
        assert_eq!(txn.get(b"old").await.unwrap(), Some(Bytes::from("stale")));

        txn.set(b"new".to_vec(), b"fresh".to_vec());
        txn.delete(b"old".to_vec());

        // Staged reads observe the buffer
        assert_eq!(txn.get(b"new").await.unwrap(), Some(Bytes::from("fresh")));
        assert_eq!(txn.get(b"old").await.unwrap(), None);

        // Nothing visible before commit
        assert!(backend.get(b"new").await.unwrap().is_none());

        txn.commit().await.unwrap();

        assert_eq!(backend.get(b"old").await.unwrap(), None);
        assert_eq!(backend.get(b"new").await.unwrap(), Some(Bytes::from("fresh")));
    }

    #[tokio::test]
    async fn test_dropped_transaction_discards_writes() {
        let backend = MemoryBackend::new();

        {
            let mut txn = backend.transaction().await.unwrap();
            txn.set(b"ghost".to_vec(), b"x".to_vec());
            // Dropped without commit
        }

        assert!(backend.get(b"ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_health_check() {
        let backend = MemoryBackend::new();
        assert!(backend.health_check().await.is_ok());
    }
}
