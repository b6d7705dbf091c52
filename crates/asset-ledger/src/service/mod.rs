//! # Asset Ledger Service
//!
//! The application service implementing `AssetLedgerApi`.
//!
//! ## Architecture
//!
//! This service:
//! 1. Resolves identifiers against the injected `AssetRegistry`
//! 2. Runs the lending state machine for every write
//! 3. Commits value, history row and history head in one atomic batch
//! 4. Serializes writers per asset; different assets never contend
//! 5. Uses dependency injection for the store and the clock

mod helpers;
mod ledger;

use crate::adapters::{InMemoryKVStore, SystemTimeSource};
use crate::domain::asset::AssetRegistry;
use crate::domain::config::LedgerConfig;
use crate::domain::errors::ConfigError;
use crate::ports::outbound::{KeyValueStore, TimeSource};
use parking_lot::Mutex;
use tracing::{info, warn};

/// The Asset Ledger Service.
pub struct AssetLedgerService<KV, TS>
where
    KV: KeyValueStore,
    TS: TimeSource,
{
    /// Key-value store for current values and history.
    pub(crate) kv_store: KV,
    /// Source of history timestamps.
    pub(crate) time_source: TS,
    /// Closed set of known assets.
    pub(crate) registry: AssetRegistry,
    /// Sentinel and policy switches.
    pub(crate) config: LedgerConfig,
    /// One writer lock per registered asset, indexed by registry position.
    pub(crate) asset_locks: Vec<Mutex<()>>,
    /// Shared writer lock for identifiers outside the registry.
    ///
    /// Only reachable when registry enforcement is switched off.
    pub(crate) unregistered_lock: Mutex<()>,
}

/// Dependencies for AssetLedgerService
pub struct LedgerDependencies<KV, TS> {
    pub kv_store: KV,
    pub time_source: TS,
}

impl<KV, TS> AssetLedgerService<KV, TS>
where
    KV: KeyValueStore,
    TS: TimeSource,
{
    /// Create a new service over the given store and clock.
    pub fn new(
        deps: LedgerDependencies<KV, TS>,
        registry: AssetRegistry,
        config: LedgerConfig,
    ) -> Result<Self, ConfigError> {
        config.validate(&registry)?;

        let policy = config.policy;
        if policy.is_relaxed() {
            warn!(
                "[asset-ledger] relaxed policy: registry {}, transitions {}",
                if policy.enforce_registry { "enforced" } else { "DISABLED" },
                if policy.enforce_transitions { "enforced" } else { "DISABLED" }
            );
        }
        if policy.require_initialization {
            info!("[asset-ledger] writes require a prior init");
        }

        info!(
            "[asset-ledger] serving {} assets, sentinel {:?}",
            registry.len(),
            config.sentinel
        );

        let asset_locks = registry.iter().map(|_| Mutex::new(())).collect();

        Ok(Self {
            kv_store: deps.kv_store,
            time_source: deps.time_source,
            registry,
            config,
            asset_locks,
            unregistered_lock: Mutex::new(()),
        })
    }

    pub fn registry(&self) -> &AssetRegistry {
        &self.registry
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn kv_store(&self) -> &KV {
        &self.kv_store
    }
}

impl AssetLedgerService<InMemoryKVStore, SystemTimeSource> {
    /// Service backed by an in-memory store and the system clock.
    pub fn new_in_memory(registry: AssetRegistry, config: LedgerConfig) -> Result<Self, ConfigError> {
        let deps = LedgerDependencies {
            kv_store: InMemoryKVStore::new(),
            time_source: SystemTimeSource,
        };
        Self::new(deps, registry, config)
    }
}
