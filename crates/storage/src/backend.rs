//! Core storage traits and types.
//!
//! The portfolio data layer is an ordered key-value store. Backends expose
//! point reads/writes, range scans (for listing indexes), TTL writes (for
//! OTPs and OAuth state), and buffered transactions for multi-key commits.

use std::ops::RangeBounds;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Canonical error type for storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying store failure (I/O, corruption, lock poisoning)
    #[error("storage error: {0}")]
    Storage(String),

    /// Invalid data encountered while decoding a stored value
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Anything that should not happen
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Key-value pair returned by range queries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: Bytes,
    pub value: Bytes,
}

/// Core trait for key-value storage operations
///
/// Keys are ordered byte strings; range scans return pairs in key order.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Get a value by key
    async fn get(&self, key: &[u8]) -> StorageResult<Option<Bytes>>;

    /// Set a key to a value
    async fn set(&self, key: Vec<u8>, value: Vec<u8>) -> StorageResult<()>;

    /// Delete a key (no-op if absent)
    async fn delete(&self, key: &[u8]) -> StorageResult<()>;

    /// Get all key-value pairs in the given key range, in key order
    async fn get_range<R>(&self, range: R) -> StorageResult<Vec<KeyValue>>
    where
        R: RangeBounds<Vec<u8>> + Send;

    /// Delete all keys in the given range
    async fn clear_range<R>(&self, range: R) -> StorageResult<()>
    where
        R: RangeBounds<Vec<u8>> + Send;

    /// Set a key with a time-to-live; the key reads as absent after expiry
    async fn set_with_ttl(
        &self,
        key: Vec<u8>,
        value: Vec<u8>,
        ttl_seconds: u64,
    ) -> StorageResult<()>;

    /// Begin a buffered transaction
    async fn transaction(&self) -> StorageResult<Box<dyn Transaction>>;

    /// Check backend liveness
    async fn health_check(&self) -> StorageResult<()>;
}

/// Buffered multi-key transaction
///
/// Writes and deletes are staged in memory and applied atomically on
/// [`commit`](Transaction::commit). Reads observe staged operations first,
/// then fall through to the backend.
#[async_trait]
pub trait Transaction: Send {
    /// Read a key, observing staged writes in this transaction
    async fn get(&self, key: &[u8]) -> StorageResult<Option<Bytes>>;

    /// Stage a write
    fn set(&mut self, key: Vec<u8>, value: Vec<u8>);

    /// Stage a delete
    fn delete(&mut self, key: Vec<u8>);

    /// Apply all staged operations atomically
    async fn commit(self: Box<Self>) -> StorageResult<()>;
}
