//! # Runtime Configuration
//!
//! Process configuration, read from `ASSET_LEDGER_*` environment variables.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `ASSET_LEDGER_ASSETS` | built-in inventory | `id:category,...` (`pc`, `wifi`) |
//! | `ASSET_LEDGER_SENTINEL` | `available` | Value marking an asset as returned |
//! | `ASSET_LEDGER_REQUIRE_INIT` | `false` | Reject writes to never-seeded assets |
//! | `ASSET_LEDGER_BACKEND` | `memory` | `memory` or `rocksdb` |
//! | `ASSET_LEDGER_DATA_DIR` | `./data/asset-ledger` | RocksDB directory |

use asset_ledger::{AssetRegistry, ConfigError, LedgerConfig, DEFAULT_SENTINEL};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

pub const ENV_ASSETS: &str = "ASSET_LEDGER_ASSETS";
pub const ENV_SENTINEL: &str = "ASSET_LEDGER_SENTINEL";
pub const ENV_REQUIRE_INIT: &str = "ASSET_LEDGER_REQUIRE_INIT";
pub const ENV_BACKEND: &str = "ASSET_LEDGER_BACKEND";
pub const ENV_DATA_DIR: &str = "ASSET_LEDGER_DATA_DIR";

/// Storage backend selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Backend {
    #[default]
    Memory,
    RocksDb,
}

impl FromStr for Backend {
    type Err = RuntimeConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" | "mem" => Ok(Backend::Memory),
            "rocksdb" => Ok(Backend::RocksDb),
            _ => Err(RuntimeConfigError::InvalidBackend {
                value: value.to_string(),
            }),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Memory => write!(f, "memory"),
            Backend::RocksDb => write!(f, "rocksdb"),
        }
    }
}

/// Errors raised while reading the process configuration.
#[derive(Debug, Error)]
pub enum RuntimeConfigError {
    #[error("{variable}: {source}")]
    Inventory {
        variable: &'static str,
        #[source]
        source: ConfigError,
    },

    #[error("Unknown storage backend {value:?}, expected memory or rocksdb")]
    InvalidBackend { value: String },

    #[error("{variable} must be true or false, got {value:?}")]
    InvalidFlag {
        variable: &'static str,
        value: String,
    },
}

/// Everything the runtime needs to build and serve a ledger.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub registry: AssetRegistry,
    pub ledger: LedgerConfig,
    pub backend: Backend,
    pub data_dir: PathBuf,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            registry: AssetRegistry::default_inventory(),
            ledger: LedgerConfig::default(),
            backend: Backend::Memory,
            data_dir: PathBuf::from("./data/asset-ledger"),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, RuntimeConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RuntimeConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(inventory) = lookup(ENV_ASSETS).filter(|s| !s.trim().is_empty()) {
            config.registry = AssetRegistry::from_inventory(&inventory).map_err(|source| {
                RuntimeConfigError::Inventory {
                    variable: ENV_ASSETS,
                    source,
                }
            })?;
        }

        let sentinel = lookup(ENV_SENTINEL).unwrap_or_else(|| DEFAULT_SENTINEL.to_string());
        config.ledger = config.ledger.with_sentinel(sentinel);

        if let Some(value) = lookup(ENV_REQUIRE_INIT) {
            let require = parse_flag(ENV_REQUIRE_INIT, &value)?;
            config.ledger = config.ledger.with_require_initialization(require);
        }

        if let Some(value) = lookup(ENV_BACKEND) {
            config.backend = value.parse()?;
        }

        if let Some(dir) = lookup(ENV_DATA_DIR) {
            config.data_dir = PathBuf::from(dir);
        }

        config
            .ledger
            .validate(&config.registry)
            .map_err(|source| RuntimeConfigError::Inventory {
                variable: ENV_SENTINEL,
                source,
            })?;

        Ok(config)
    }
}

fn parse_flag(variable: &'static str, value: &str) -> Result<bool, RuntimeConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(RuntimeConfigError::InvalidFlag {
            variable,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.registry.len(), 7);
        assert_eq!(config.ledger.sentinel, "available");
        assert!(!config.ledger.policy.require_initialization);
        assert_eq!(config.backend, Backend::Memory);
    }

    #[test]
    fn test_overrides() {
        let config = RuntimeConfig::from_lookup(lookup(&[
            (ENV_ASSETS, "lab_pc:pc,router_1:wifi"),
            (ENV_SENTINEL, "ict"),
            (ENV_REQUIRE_INIT, "yes"),
            (ENV_BACKEND, "RocksDB"),
            (ENV_DATA_DIR, "/var/lib/ledger"),
        ]))
        .unwrap();

        assert_eq!(config.registry.len(), 2);
        assert!(config.registry.is_known_asset("router_1"));
        assert_eq!(config.ledger.sentinel, "ict");
        assert!(config.ledger.policy.require_initialization);
        assert_eq!(config.backend, Backend::RocksDb);
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/ledger"));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            RuntimeConfig::from_lookup(lookup(&[(ENV_BACKEND, "sqlite")])),
            Err(RuntimeConfigError::InvalidBackend { .. })
        ));
        assert!(matches!(
            RuntimeConfig::from_lookup(lookup(&[(ENV_REQUIRE_INIT, "maybe")])),
            Err(RuntimeConfigError::InvalidFlag { .. })
        ));
        assert!(matches!(
            RuntimeConfig::from_lookup(lookup(&[(ENV_ASSETS, "pc_a:tablet")])),
            Err(RuntimeConfigError::Inventory { .. })
        ));
        // Sentinel may not shadow an asset
        assert!(matches!(
            RuntimeConfig::from_lookup(lookup(&[(ENV_SENTINEL, "pc_a")])),
            Err(RuntimeConfigError::Inventory { .. })
        ));
    }
}
