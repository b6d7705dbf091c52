//! # Asset Ledger Runtime
//!
//! Hosts one `AssetLedgerService` in a process.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from the environment
//! 2. Open the selected storage backend
//! 3. Build the service and seed unseeded assets (`seed`); open loans survive
//!    a restart
//! 4. Serve commands until stdin closes or Ctrl+C
//!
//! ## Modules
//!
//! - `adapters/` - Storage backends (in-memory, RocksDB)
//! - `config` - Environment configuration
//! - `shell` - Line protocol on top of `CommandDispatcher`

pub mod adapters;
pub mod config;
pub mod shell;

use std::sync::Arc;

use anyhow::{Context, Result};
use asset_ledger::{
    AssetLedgerApi, AssetLedgerService, CommandDispatcher, InMemoryKVStore, InitReport,
    LedgerDependencies, SystemTimeSource,
};
use tracing::info;

use crate::adapters::LedgerStore;
use crate::config::{Backend, RuntimeConfig};

pub type RuntimeLedger = AssetLedgerService<LedgerStore, SystemTimeSource>;

/// A configured ledger plus its command front end.
pub struct LedgerRuntime {
    dispatcher: CommandDispatcher<RuntimeLedger>,
    backend: &'static str,
}

impl LedgerRuntime {
    /// Open storage and build the service. Does not seed anything yet.
    pub fn new(config: RuntimeConfig) -> Result<Self> {
        let kv_store = open_store(&config)?;
        let backend = kv_store.backend_name();

        let deps = LedgerDependencies {
            kv_store,
            time_source: SystemTimeSource,
        };
        let service = AssetLedgerService::new(deps, config.registry, config.ledger)
            .context("Failed to build asset ledger")?;

        Ok(Self {
            dispatcher: CommandDispatcher::new(Arc::new(service)),
            backend,
        })
    }

    /// Seed every registered asset that has no value yet.
    ///
    /// Checked-out assets keep their holder. An explicit `invoke init`
    /// remains the way to reclaim them.
    pub fn start(&self) -> Result<InitReport> {
        info!("===========================================");
        info!("  Asset Ledger Runtime v{}", env!("CARGO_PKG_VERSION"));
        info!("  Backend: {}", self.backend);
        info!("===========================================");

        let report = self
            .ledger()
            .seed()
            .context("Failed to seed asset inventory")?;
        info!(
            "[ledger-runtime] {} assets ready",
            self.ledger().registry().len()
        );
        Ok(report)
    }

    pub fn dispatcher(&self) -> &CommandDispatcher<RuntimeLedger> {
        &self.dispatcher
    }

    pub fn ledger(&self) -> &Arc<RuntimeLedger> {
        self.dispatcher.ledger()
    }
}

fn open_store(config: &RuntimeConfig) -> Result<LedgerStore> {
    match config.backend {
        Backend::Memory => Ok(LedgerStore::Memory(InMemoryKVStore::new())),
        #[cfg(feature = "rocksdb")]
        Backend::RocksDb => {
            let store = adapters::RocksDbStore::open(adapters::RocksDbConfig::at(&config.data_dir))
                .with_context(|| {
                    format!("Failed to open RocksDB at {}", config.data_dir.display())
                })?;
            info!("[ledger-runtime] RocksDB opened at {}", store.path().display());
            Ok(LedgerStore::RocksDb(store))
        }
        #[cfg(not(feature = "rocksdb"))]
        Backend::RocksDb => {
            anyhow::bail!("Backend rocksdb requested but ledger-runtime was built without the rocksdb feature")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asset_ledger::Ownership;

    #[test]
    fn test_memory_runtime_starts_seeded() {
        let runtime = LedgerRuntime::new(RuntimeConfig::default()).unwrap();

        let report = runtime.start().unwrap();

        assert_eq!(report.seeded, 7);
        assert_eq!(runtime.ledger().read("pc_a").unwrap(), Ownership::Available);
    }

    #[test]
    fn test_restart_keeps_checked_out_assets() {
        let runtime = LedgerRuntime::new(RuntimeConfig::default()).unwrap();
        runtime.start().unwrap();
        runtime.ledger().write("pc_b", "alice").unwrap();

        let report = runtime.start().unwrap();

        assert_eq!(report.seeded, 0);
        assert_eq!(report.retained, 1);
        assert_eq!(report.reclaimed, 0);
        assert_eq!(
            runtime.ledger().read("pc_b").unwrap(),
            Ownership::checked_out("alice")
        );
        assert_eq!(runtime.ledger().read_history("pc_b").unwrap().len(), 1);
    }

    #[cfg(not(feature = "rocksdb"))]
    #[test]
    fn test_rocksdb_without_feature_fails() {
        let config = RuntimeConfig {
            backend: Backend::RocksDb,
            ..Default::default()
        };
        assert!(LedgerRuntime::new(config).is_err());
    }
}
