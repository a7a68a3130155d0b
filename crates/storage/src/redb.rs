//! Persistent file-backed storage via redb.
//!
//! Single-table embedded store. TTL support is encoded in the value: the
//! first 8 bytes hold a big-endian unix-millisecond expiry (0 = never),
//! followed by the payload. Expired entries read as absent and are dropped
//! lazily when overwritten.

use std::{
    ops::{Bound, RangeBounds},
    path::Path,
    sync::Arc,
};

use async_trait::async_trait;
use bytes::Bytes;
use redb::{Database, ReadableTable, TableDefinition};

use crate::backend::{KeyValue, StorageBackend, StorageError, StorageResult, Transaction};

const TABLE: TableDefinition<&[u8], &[u8]> = TableDefinition::new("folio");

/// Length of the expiry prefix on every stored value
const EXPIRY_PREFIX_LEN: usize = 8;

fn storage_err(e: impl std::fmt::Display) -> StorageError {
    StorageError::Storage(e.to_string())
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn encode_value(payload: &[u8], expires_at_millis: i64) -> Vec<u8> {
    let mut out = Vec::with_capacity(EXPIRY_PREFIX_LEN + payload.len());
    out.extend_from_slice(&expires_at_millis.to_be_bytes());
    out.extend_from_slice(payload);
    out
}

fn decode_value(raw: &[u8]) -> StorageResult<Option<Bytes>> {
    if raw.len() < EXPIRY_PREFIX_LEN {
        return Err(StorageError::Serialization("stored value shorter than expiry prefix".into()));
    }
    let mut prefix = [0u8; EXPIRY_PREFIX_LEN];
    prefix.copy_from_slice(&raw[..EXPIRY_PREFIX_LEN]);
    let expires_at = i64::from_be_bytes(prefix);
    if expires_at != 0 && now_millis() >= expires_at {
        return Ok(None);
    }
    Ok(Some(Bytes::copy_from_slice(&raw[EXPIRY_PREFIX_LEN..])))
}

fn owned_bounds<R: RangeBounds<Vec<u8>>>(range: R) -> (Bound<Vec<u8>>, Bound<Vec<u8>>) {
    (range.start_bound().cloned(), range.end_bound().cloned())
}

fn as_slice_bound(bound: &Bound<Vec<u8>>) -> Bound<&[u8]> {
    match bound {
        Bound::Included(v) => Bound::Included(v.as_slice()),
        Bound::Excluded(v) => Bound::Excluded(v.as_slice()),
        Bound::Unbounded => Bound::Unbounded,
    }
}

/// File-backed storage backend
#[derive(Clone)]
pub struct RedbBackend {
    db: Arc<Database>,
}

impl RedbBackend {
    /// Open or create a database file at the given path
    pub fn open(path: &Path) -> StorageResult<Self> {
        let db = Database::create(path).map_err(storage_err)?;

        // Ensure the table exists before the first read
        let write_txn = db.begin_write().map_err(storage_err)?;
        {
            let _table = write_txn.open_table(TABLE).map_err(storage_err)?;
        }
        write_txn.commit().map_err(storage_err)?;

        Ok(Self { db: Arc::new(db) })
    }

    async fn run_blocking<F, T>(&self, f: F) -> StorageResult<T>
    where
        F: FnOnce(Arc<Database>) -> StorageResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || f(db))
            .await
            .map_err(|e| StorageError::Internal(format!("blocking task failed: {e}")))?
    }

    fn write_one(db: &Database, key: &[u8], value: &[u8]) -> StorageResult<()> {
        let write_txn = db.begin_write().map_err(storage_err)?;
        {
            let mut table = write_txn.open_table(TABLE).map_err(storage_err)?;
            table.insert(key, value).map_err(storage_err)?;
        }
        write_txn.commit().map_err(storage_err)
    }
}

#[async_trait]
impl StorageBackend for RedbBackend {
    async fn get(&self, key: &[u8]) -> StorageResult<Option<Bytes>> {
        let key = key.to_vec();
        self.run_blocking(move |db| {
            let read_txn = db.begin_read().map_err(storage_err)?;
            let table = read_txn.open_table(TABLE).map_err(storage_err)?;
            match table.get(key.as_slice()).map_err(storage_err)? {
                Some(raw) => decode_value(raw.value()),
                None => Ok(None),
            }
        })
        .await
    }

    async fn set(&self, key: Vec<u8>, value: Vec<u8>) -> StorageResult<()> {
        self.run_blocking(move |db| Self::write_one(&db, &key, &encode_value(&value, 0))).await
    }

    async fn delete(&self, key: &[u8]) -> StorageResult<()> {
        let key = key.to_vec();
        self.run_blocking(move |db| {
            let write_txn = db.begin_write().map_err(storage_err)?;
            {
                let mut table = write_txn.open_table(TABLE).map_err(storage_err)?;
                table.remove(key.as_slice()).map_err(storage_err)?;
            }
            write_txn.commit().map_err(storage_err)
        })
        .await
    }

    async fn get_range<R>(&self, range: R) -> StorageResult<Vec<KeyValue>>
    where
        R: RangeBounds<Vec<u8>> + Send,
    {
        let bounds = owned_bounds(range);
        self.run_blocking(move |db| {
            let read_txn = db.begin_read().map_err(storage_err)?;
            let table = read_txn.open_table(TABLE).map_err(storage_err)?;
            let iter = table
                .range::<&[u8]>((as_slice_bound(&bounds.0), as_slice_bound(&bounds.1)))
                .map_err(storage_err)?;

            let mut results = Vec::new();
            for entry in iter {
                let (key, raw) = entry.map_err(storage_err)?;
                if let Some(value) = decode_value(raw.value())? {
                    results.push(KeyValue { key: Bytes::copy_from_slice(key.value()), value });
                }
            }
            Ok(results)
        })
        .await
    }

    async fn clear_range<R>(&self, range: R) -> StorageResult<()>
    where
        R: RangeBounds<Vec<u8>> + Send,
    {
        let bounds = owned_bounds(range);
        self.run_blocking(move |db| {
            let write_txn = db.begin_write().map_err(storage_err)?;
            {
                let mut table = write_txn.open_table(TABLE).map_err(storage_err)?;
                let keys: Vec<Vec<u8>> = {
                    let iter = table
                        .range::<&[u8]>((as_slice_bound(&bounds.0), as_slice_bound(&bounds.1)))
                        .map_err(storage_err)?;
                    let mut keys = Vec::new();
                    for entry in iter {
                        let (key, _) = entry.map_err(storage_err)?;
                        keys.push(key.value().to_vec());
                    }
                    keys
                };
                for key in keys {
                    table.remove(key.as_slice()).map_err(storage_err)?;
                }
            }
            write_txn.commit().map_err(storage_err)
        })
        .await
    }

    async fn set_with_ttl(
        &self,
        key: Vec<u8>,
        value: Vec<u8>,
        ttl_seconds: u64,
    ) -> StorageResult<()> {
        let expires_at = now_millis() + (ttl_seconds as i64) * 1000;
        self.run_blocking(move |db| Self::write_one(&db, &key, &encode_value(&value, expires_at)))
            .await
    }

    async fn transaction(&self) -> StorageResult<Box<dyn Transaction>> {
        Ok(Box::new(RedbTransaction { backend: self.clone(), ops: Vec::new() }))
    }

    async fn health_check(&self) -> StorageResult<()> {
        self.run_blocking(|db| {
            db.begin_read().map_err(storage_err)?;
            Ok(())
        })
        .await
    }
}

enum Op {
    Set(Vec<u8>, Vec<u8>),
    Delete(Vec<u8>),
}

/// Buffered transaction applied in a single redb write transaction
struct RedbTransaction {
    backend: RedbBackend,
    ops: Vec<Op>,
}

#[async_trait]
impl Transaction for RedbTransaction {
    async fn get(&self, key: &[u8]) -> StorageResult<Option<Bytes>> {
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
        let ops = self.ops;
        self.backend
            .run_blocking(move |db| {
                let write_txn = db.begin_write().map_err(storage_err)?;
                {
                    let mut table = write_txn.open_table(TABLE).map_err(storage_err)?;
                    for op in &ops {
                        match op {
                            Op::Set(key, value) => {
                                table
                                    .insert(key.as_slice(), encode_value(value, 0).as_slice())
                                    .map_err(storage_err)?;
                            },
                            Op::Delete(key) => {
                                table.remove(key.as_slice()).map_err(storage_err)?;
                            },
                        }
                    }
                }
                write_txn.commit().map_err(storage_err)
            })
            .await
    }
}
