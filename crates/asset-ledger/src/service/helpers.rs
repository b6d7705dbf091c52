//! # Service Helpers
//!
//! Identifier resolution, locking and record (de)serialization.

use super::*;
use crate::domain::asset::AssetId;
use crate::domain::config::KeyPrefix;
use crate::domain::errors::{LedgerError, LedgerResult};
use crate::domain::history::{HistoryEntry, HistoryHead};
use crate::domain::ownership::{Ownership, TransitionKind};
use crate::ports::outbound::BatchOperation;
use chrono::{DateTime, Utc};
use tracing::debug;

impl<KV, TS> AssetLedgerService<KV, TS>
where
    KV: KeyValueStore,
    TS: TimeSource,
{
    /// Map a host identifier to an asset, applying the registry policy.
    pub(crate) fn resolve(&self, asset: &str) -> LedgerResult<AssetId> {
        if let Some(descriptor) = self.registry.get(asset) {
            return Ok(descriptor.id.clone());
        }
        if !self.config.policy.enforce_registry && AssetId::validate(asset).is_ok() {
            debug!("[asset-ledger] accepting unregistered asset {}", asset);
            return Ok(AssetId::new(asset));
        }
        Err(LedgerError::unknown_asset(asset))
    }

    pub(crate) fn lock_for(&self, asset: &AssetId) -> &Mutex<()> {
        match self.registry.position(asset.as_str()) {
            Some(position) => &self.asset_locks[position],
            None => &self.unregistered_lock,
        }
    }

    pub(crate) fn parse_value(&self, asset: &AssetId, value: &str) -> LedgerResult<Ownership> {
        Ownership::from_value(value, &self.config.sentinel).map_err(|reason| {
            LedgerError::InvalidHolder {
                asset: asset.to_string(),
                reason,
            }
        })
    }

    pub(crate) fn load_ownership(&self, asset: &AssetId) -> LedgerResult<Option<Ownership>> {
        match self.kv_store.get(&KeyPrefix::ownership_key(asset.as_str()))? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    pub(crate) fn load_head(&self, asset: &AssetId) -> LedgerResult<HistoryHead> {
        match self.kv_store.get(&KeyPrefix::head_key(asset.as_str()))? {
            Some(bytes) => Ok(bincode::deserialize(&bytes)?),
            None => Ok(HistoryHead::default()),
        }
    }

    /// Every history row of `asset`, oldest first.
    pub(crate) fn load_history(&self, asset: &AssetId) -> LedgerResult<Vec<HistoryEntry>> {
        let rows = self
            .kv_store
            .prefix_scan(&KeyPrefix::history_prefix(asset.as_str()))?;

        let mut entries = rows
            .iter()
            .map(|(_, bytes)| bincode::deserialize::<HistoryEntry>(bytes))
            .collect::<Result<Vec<_>, _>>()?;
        entries.retain(|entry| &entry.asset == asset);
        entries.sort_by_key(|entry| entry.sequence);
        Ok(entries)
    }

    /// Build the batch for one committed transition: new value, history row
    /// and advanced history head. Nothing is written here.
    pub(crate) fn transition_ops(
        &self,
        asset: &AssetId,
        kind: TransitionKind,
        previous: Option<Ownership>,
        new: Ownership,
        now: DateTime<Utc>,
    ) -> LedgerResult<(HistoryEntry, Vec<BatchOperation>)> {
        let mut head = self.load_head(asset)?;
        let entry = head.append(asset.clone(), kind, previous, new, now);

        let operations = vec![
            BatchOperation::put(
                KeyPrefix::ownership_key(asset.as_str()),
                bincode::serialize(&entry.new)?,
            ),
            BatchOperation::put(
                KeyPrefix::history_key(asset.as_str(), entry.sequence),
                bincode::serialize(&entry)?,
            ),
            BatchOperation::put(
                KeyPrefix::head_key(asset.as_str()),
                bincode::serialize(&head)?,
            ),
        ];

        Ok((entry, operations))
    }

    pub(crate) fn render(&self, ownership: &Ownership) -> String {
        ownership.as_value(&self.config.sentinel).to_string()
    }
}
