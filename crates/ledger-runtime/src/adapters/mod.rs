//! # Storage Adapters
//!
//! Backends the runtime can put under the ledger.
//!
//! Enable the `rocksdb` feature for the persistent store:
//!
//! ```toml
//! ledger-runtime = { path = "...", features = ["rocksdb"] }
//! ```

#[cfg(feature = "rocksdb")]
pub mod rocksdb_adapter;

#[cfg(feature = "rocksdb")]
pub use rocksdb_adapter::{RocksDbConfig, RocksDbStore};

use asset_ledger::{BatchOperation, InMemoryKVStore, KVStoreError, KeyValueStore};

/// The store selected at startup.
pub enum LedgerStore {
    Memory(InMemoryKVStore),
    #[cfg(feature = "rocksdb")]
    RocksDb(RocksDbStore),
}

impl LedgerStore {
    pub fn backend_name(&self) -> &'static str {
        match self {
            LedgerStore::Memory(_) => "memory",
            #[cfg(feature = "rocksdb")]
            LedgerStore::RocksDb(_) => "rocksdb",
        }
    }

    fn inner(&self) -> &dyn KeyValueStore {
        match self {
            LedgerStore::Memory(store) => store,
            #[cfg(feature = "rocksdb")]
            LedgerStore::RocksDb(store) => store,
        }
    }
}

impl KeyValueStore for LedgerStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        self.inner().get(key)
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        self.inner().put(key, value)
    }

    fn atomic_batch_write(&self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        self.inner().atomic_batch_write(operations)
    }

    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        self.inner().exists(key)
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, KVStoreError> {
        self.inner().prefix_scan(prefix)
    }
}
