//! # Asset Ledger
//!
//! Ownership ledger for a fixed inventory of lendable assets (PCs and mobile
//! Wi-Fi routers). Every asset is either available (held by the custodian) or
//! checked out to a named holder, and every change of hands is appended to a
//! hash-linked history.
//!
//! ## Architecture
//!
//! ```text
//! host command ──→ [CommandDispatcher] ──→ [AssetLedgerService]
//!                                              │
//!                         ┌────────────────────┼─────────────────────┐
//!                         ↓                    ↓                     ↓
//!                  [AssetRegistry]   [ownership::evaluate]   [KeyValueStore]
//!                  (known assets)    (lending rules)         o: current value
//!                                                            h: history rows
//!                                                            n: history head
//! ```
//!
//! ## Domain Invariants
//!
//! | Invariant | Description |
//! |-----------|-------------|
//! | Single Record | A registered asset has exactly one current value once initialized |
//! | Complete History | Replaying the history of an asset reproduces its current value |
//! | Atomic Commit | Value update and history append land in one batch or not at all |
//! | Lending Protocol | No double checkout, no double return, no self-renewal |
//! | Serialized Writers | Read-validate-write on one asset runs under that asset's lock |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Registry, ownership state machine, history entries, errors
//! - `ports/` - Inbound API and outbound store / clock traits
//! - `adapters/` - In-memory store and system clock
//! - `service/` - Application service implementing the API
//! - `ipc/` - Command dispatch for the hosting runtime
//!
//! ## Usage
//!
//! ```ignore
//! use asset_ledger::{AssetLedgerService, AssetLedgerApi, AssetRegistry, LedgerConfig};
//!
//! let service = AssetLedgerService::new_in_memory(
//!     AssetRegistry::default_inventory(),
//!     LedgerConfig::default(),
//! )?;
//!
//! service.init()?;
//! service.write("pc_a", "alice")?;
//! assert_eq!(service.read("pc_a")?.as_value("available"), "alice");
//! ```

pub mod adapters;
pub mod domain;
pub mod ipc;
pub mod ports;
pub mod service;

pub use adapters::{InMemoryKVStore, ManualTimeSource, SystemTimeSource};
pub use domain::asset::{AssetCategory, AssetDescriptor, AssetId, AssetRegistry};
pub use domain::config::{KeyPrefix, LedgerConfig, LedgerPolicy};
pub use domain::errors::{ConfigError, KVStoreError, LedgerError, LedgerResult};
pub use domain::history::{HistoryAudit, HistoryEntry, HistoryHead, HistoryRecord};
pub use domain::ownership::{Holder, Ownership, Rejection, TransitionKind, DEFAULT_SENTINEL};
pub use ipc::{Command, CommandDispatcher};
pub use ports::inbound::{AssetLedgerApi, InitReport};
pub use ports::outbound::{BatchOperation, KeyValueStore, TimeSource};
pub use service::{AssetLedgerService, LedgerDependencies};
