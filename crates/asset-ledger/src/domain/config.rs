//! # Ledger Configuration
//!
//! Sentinel value, policy switches and the key layout of the backing store.

use crate::domain::asset::AssetRegistry;
use crate::domain::errors::ConfigError;

pub use crate::domain::ownership::DEFAULT_SENTINEL;

/// Validation switches.
///
/// The defaults enforce everything. Turning a check off is an explicit,
/// logged configuration choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerPolicy {
    /// Reject identifiers that are not in the registry (default: true).
    pub enforce_registry: bool,

    /// Apply the lending table to writes (default: true).
    pub enforce_transitions: bool,

    /// Reject writes to assets that were never initialized (default: false).
    ///
    /// When `false` the first write to such an asset is accepted
    /// unconditionally and establishes its initial state.
    pub require_initialization: bool,
}

impl LedgerPolicy {
    /// True when the registry or the lending table is not enforced.
    pub fn is_relaxed(&self) -> bool {
        !self.enforce_registry || !self.enforce_transitions
    }
}

impl Default for LedgerPolicy {
    fn default() -> Self {
        Self {
            enforce_registry: true,
            enforce_transitions: true,
            require_initialization: false,
        }
    }
}

/// Configuration for the ledger service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Value that marks an asset as held by the custodian (default: `available`).
    pub sentinel: String,
    pub policy: LedgerPolicy,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            sentinel: DEFAULT_SENTINEL.to_string(),
            policy: LedgerPolicy::default(),
        }
    }
}

impl LedgerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.sentinel = sentinel.into();
        self
    }

    pub fn with_policy(mut self, policy: LedgerPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_require_initialization(mut self, require: bool) -> Self {
        self.policy.require_initialization = require;
        self
    }

    /// Check the configuration against the registry it will serve.
    pub fn validate(&self, registry: &AssetRegistry) -> Result<(), ConfigError> {
        if self.sentinel.is_empty() {
            return Err(ConfigError::EmptySentinel);
        }
        if registry.is_known_asset(&self.sentinel) {
            return Err(ConfigError::SentinelIsAsset {
                sentinel: self.sentinel.clone(),
            });
        }
        Ok(())
    }
}

/// Key prefixes for the key-value store.
///
/// All keys are prefixed to namespace the different record types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPrefix {
    /// Current value: `o:{asset}` -> Ownership
    Ownership,
    /// History row: `h:{asset}:{sequence:020}` -> HistoryEntry
    History,
    /// History tail: `n:{asset}` -> HistoryHead
    HistoryHead,
}

impl KeyPrefix {
    /// Get the byte prefix for this key type.
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            KeyPrefix::Ownership => b"o:",
            KeyPrefix::History => b"h:",
            KeyPrefix::HistoryHead => b"n:",
        }
    }

    pub fn ownership_key(asset: &str) -> Vec<u8> {
        Self::compose(KeyPrefix::Ownership, asset)
    }

    pub fn head_key(asset: &str) -> Vec<u8> {
        Self::compose(KeyPrefix::HistoryHead, asset)
    }

    /// Prefix covering every history row of one asset.
    pub fn history_prefix(asset: &str) -> Vec<u8> {
        let mut key = Self::compose(KeyPrefix::History, asset);
        key.push(b':');
        key
    }

    /// Zero-padded so byte order equals sequence order.
    pub fn history_key(asset: &str, sequence: u64) -> Vec<u8> {
        let mut key = Self::history_prefix(asset);
        key.extend_from_slice(format!("{:020}", sequence).as_bytes());
        key
    }

    fn compose(prefix: KeyPrefix, asset: &str) -> Vec<u8> {
        let mut key = Vec::with_capacity(prefix.as_bytes().len() + asset.len());
        key.extend_from_slice(prefix.as_bytes());
        key.extend_from_slice(asset.as_bytes());
        key
    }
}
