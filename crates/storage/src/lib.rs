//! # Folio Storage
//!
//! Ordered key-value storage for the portfolio API. Two backends share one
//! trait: an in-memory map for development and tests, and a persistent redb
//! database for production.

#![deny(unsafe_code)]

pub mod backend;
pub mod factory;
pub mod memory;
pub mod redb;

pub use backend::{KeyValue, StorageBackend, StorageError, StorageResult, Transaction};
pub use factory::{create_storage_backend, Backend, StorageConfig};
pub use memory::MemoryBackend;
pub use redb::RedbBackend;
