//! # Outbound Ports (Driven Ports)
//!
//! Dependencies required by the ledger service.
//!
//! These are the interfaces the hosting application implements.

use crate::domain::errors::KVStoreError;
use chrono::{DateTime, Utc};

/// Abstract interface for key-value database operations.
///
/// Receivers are `&self`: implementations synchronize internally so one
/// store can serve writers on different assets concurrently.
///
/// Testing: `InMemoryKVStore` (adapters/memory.rs)
/// Production: `RocksDbStore` (ledger-runtime/adapters/rocksdb_adapter.rs)
pub trait KeyValueStore: Send + Sync {
    /// Get a value by key.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError>;

    /// Put a single key-value pair.
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError>;

    /// Execute an atomic batch write.
    ///
    /// Either ALL operations in the batch are applied, or NONE are.
    fn atomic_batch_write(&self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError>;

    /// Check if a key exists.
    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        Ok(self.get(key)?.is_some())
    }

    /// All pairs whose key starts with `prefix`, in ascending key order.
    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, KVStoreError>;
}

/// Batch operation for atomic writes.
///
/// The ledger only ever appends or overwrites, so puts are the whole set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOperation {
    /// Put a key-value pair.
    Put { key: Vec<u8>, value: Vec<u8> },
}

impl BatchOperation {
    /// Create a Put operation.
    pub fn put(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Put {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Abstract interface for time operations (for testability).
///
/// History timestamps come from here, never from the caller.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
