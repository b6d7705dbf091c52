//! # Inbound Ports (Driving Ports)
//!
//! The primary API of the asset ledger.

use crate::domain::errors::LedgerResult;
use crate::domain::history::{HistoryAudit, HistoryEntry};
use crate::domain::ownership::Ownership;
use serde::{Deserialize, Serialize};

/// Outcome of `init`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitReport {
    /// Assets that had no value and were seeded as available.
    pub seeded: usize,
    /// Checked-out assets forced back to available (one history entry each).
    pub reclaimed: usize,
    /// Checked-out assets left with their holder (`seed` only).
    pub retained: usize,
    /// Assets that were already available.
    pub unchanged: usize,
}

/// Primary API of the asset ledger.
///
/// Implementations must enforce the lending protocol and commit value and
/// history together.
pub trait AssetLedgerApi: Send + Sync {
    /// Seed every registered asset with the available value.
    ///
    /// Idempotent. Never truncates history: a checked-out asset is reclaimed
    /// with a recorded `holder -> available` entry.
    fn init(&self) -> LedgerResult<InitReport>;

    /// Seed only the assets that have no value yet.
    ///
    /// Checked-out assets keep their holder and no history is written, so a
    /// process restart over a persistent store preserves every open loan.
    fn seed(&self) -> LedgerResult<InitReport>;

    /// Request a new ownership value for an asset.
    ///
    /// ## Errors
    ///
    /// - `UnknownAsset`: identifier not registered (or never initialized when
    ///   initialization is required)
    /// - `InvalidHolder`: empty value
    /// - `IllegalTransition`: double checkout, double return or self-renewal
    /// - `StoreFailure`: nothing was committed
    fn write(&self, asset: &str, value: &str) -> LedgerResult<HistoryEntry>;

    /// Current ownership value.
    ///
    /// ## Errors
    ///
    /// - `UnknownAsset`: identifier not registered
    /// - `NotFound`: registered but never initialized
    fn read(&self, asset: &str) -> LedgerResult<Ownership>;

    /// Full history, oldest first, materialized at call time.
    ///
    /// Empty for a registered asset that was never written.
    fn read_history(&self, asset: &str) -> LedgerResult<Vec<HistoryEntry>>;

    /// Verify the hash chain and replay it against the current value.
    fn verify_history(&self, asset: &str) -> LedgerResult<HistoryAudit>;

    fn is_known_asset(&self, asset: &str) -> bool;

    /// Value that marks an asset as available.
    fn sentinel(&self) -> &str;
}
