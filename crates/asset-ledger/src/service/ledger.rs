//! # Asset Ledger API Implementation
//!
//! Implements the AssetLedgerApi trait.

use super::*;
use crate::domain::asset::AssetId;
use crate::domain::config::KeyPrefix;
use crate::domain::errors::{LedgerError, LedgerResult};
use crate::domain::history::{replay, HistoryAudit, HistoryEntry};
use crate::domain::ownership::{evaluate, Ownership, TransitionKind};
use crate::ports::inbound::{AssetLedgerApi, InitReport};
use crate::ports::outbound::BatchOperation;
use tracing::{debug, error};

impl<KV, TS> AssetLedgerService<KV, TS>
where
    KV: KeyValueStore,
    TS: TimeSource,
{
    /// Apply the lending table, or record an unchecked transition when the
    /// policy disables it.
    fn check_transition(
        &self,
        asset: &AssetId,
        current: Option<&Ownership>,
        requested: &Ownership,
    ) -> LedgerResult<TransitionKind> {
        match evaluate(current, requested) {
            Ok(kind) => Ok(kind),
            Err(rejection) if !self.config.policy.enforce_transitions => {
                warn!(
                    "[asset-ledger] {}: accepting {} -> {} despite: {}",
                    asset,
                    current.map(|c| self.render(c)).unwrap_or_default(),
                    self.render(requested),
                    rejection
                );
                Ok(TransitionKind::Unchecked)
            }
            Err(rejection) => {
                let current = current.map(|c| self.render(c)).unwrap_or_default();
                let requested = self.render(requested);
                warn!(
                    "[asset-ledger] {}: rejected {} -> {}: {}",
                    asset, current, requested, rejection
                );
                Err(LedgerError::IllegalTransition {
                    asset: asset.to_string(),
                    current,
                    requested,
                    rejection,
                })
            }
        }
    }

    /// Give every unseeded asset the available value. Checked-out assets are
    /// reclaimed when `reclaim` is set and left with their holder otherwise.
    fn seed_inventory(&self, reclaim: bool) -> LedgerResult<InitReport> {
        // Registry order: concurrent inits acquire locks in the same sequence.
        let _guards: Vec<_> = self.asset_locks.iter().map(|lock| lock.lock()).collect();

        let now = self.time_source.now();
        let mut report = InitReport::default();
        let mut operations = Vec::new();
        let mut reclaimed = Vec::new();

        for asset in self.registry.ids() {
            match self.load_ownership(asset)? {
                None => {
                    operations.push(BatchOperation::put(
                        KeyPrefix::ownership_key(asset.as_str()),
                        bincode::serialize(&Ownership::Available)?,
                    ));
                    report.seeded += 1;
                }
                Some(Ownership::Available) => report.unchanged += 1,
                Some(_) if !reclaim => report.retained += 1,
                Some(previous) => {
                    let (entry, ops) = self.transition_ops(
                        asset,
                        TransitionKind::Reclaim,
                        Some(previous),
                        Ownership::Available,
                        now,
                    )?;
                    operations.extend(ops);
                    reclaimed.push(entry);
                    report.reclaimed += 1;
                }
            }
        }

        if !operations.is_empty() {
            self.kv_store.atomic_batch_write(operations).map_err(|e| {
                error!("[asset-ledger] init failed, nothing written: {}", e);
                LedgerError::from(e)
            })?;
        }

        for entry in &reclaimed {
            warn!(
                "[asset-ledger] {}: reclaimed from {} by init",
                entry.asset,
                entry.previous.as_ref().map(|p| self.render(p)).unwrap_or_default()
            );
        }
        info!(
            "[asset-ledger] {}: {} seeded, {} reclaimed, {} retained, {} unchanged",
            if reclaim { "init" } else { "seed" },
            report.seeded,
            report.reclaimed,
            report.retained,
            report.unchanged
        );

        Ok(report)
    }

    fn commit(&self, asset: &AssetId, operations: Vec<BatchOperation>) -> LedgerResult<()> {
        self.kv_store.atomic_batch_write(operations).map_err(|e| {
            error!("[asset-ledger] {}: commit failed, nothing written: {}", asset, e);
            LedgerError::from(e)
        })
    }
}

impl<KV, TS> AssetLedgerApi for AssetLedgerService<KV, TS>
where
    KV: KeyValueStore,
    TS: TimeSource,
{
    fn init(&self) -> LedgerResult<InitReport> {
        self.seed_inventory(true)
    }

    fn seed(&self) -> LedgerResult<InitReport> {
        self.seed_inventory(false)
    }

    fn write(&self, asset: &str, value: &str) -> LedgerResult<HistoryEntry> {
        let asset = self.resolve(asset)?;
        let requested = self.parse_value(&asset, value)?;

        let _guard = self.lock_for(&asset).lock();

        let current = self.load_ownership(&asset)?;
        if current.is_none() && self.config.policy.require_initialization {
            warn!("[asset-ledger] {}: write before init rejected", asset);
            return Err(LedgerError::unknown_asset(asset.as_str()));
        }

        let kind = self.check_transition(&asset, current.as_ref(), &requested)?;
        let (entry, operations) =
            self.transition_ops(&asset, kind, current, requested, self.time_source.now())?;
        self.commit(&asset, operations)?;

        info!(
            "[asset-ledger] {}: {:?} #{} {} -> {}",
            asset,
            entry.kind,
            entry.sequence,
            entry.previous.as_ref().map(|p| self.render(p)).unwrap_or_default(),
            self.render(&entry.new)
        );

        Ok(entry)
    }

    fn read(&self, asset: &str) -> LedgerResult<Ownership> {
        let asset = self.resolve(asset)?;
        let ownership = self
            .load_ownership(&asset)?
            .ok_or_else(|| LedgerError::NotFound {
                asset: asset.to_string(),
            })?;
        debug!("[asset-ledger] read {} = {}", asset, self.render(&ownership));
        Ok(ownership)
    }

    fn read_history(&self, asset: &str) -> LedgerResult<Vec<HistoryEntry>> {
        let asset = self.resolve(asset)?;
        let entries = self.load_history(&asset)?;
        debug!("[asset-ledger] read_history {}: {} entries", asset, entries.len());
        Ok(entries)
    }

    fn verify_history(&self, asset: &str) -> LedgerResult<HistoryAudit> {
        let asset = self.resolve(asset)?;

        // Hold the writer lock so rows, head and value come from one state.
        let _guard = self.lock_for(&asset).lock();

        let entries = self.load_history(&asset)?;
        let replayed = replay(&entries).map_err(|brk| LedgerError::HistoryCorrupted {
            asset: asset.to_string(),
            sequence: brk.sequence,
            reason: brk.reason,
        })?;

        let head = self.load_head(&asset)?;
        let last_hash = entries.last().map(|e| e.hash).unwrap_or_default();
        if head.next_sequence != entries.len() as u64 || head.last_hash != last_hash {
            return Err(LedgerError::HistoryCorrupted {
                asset: asset.to_string(),
                sequence: entries.len() as u64,
                reason: "history head does not match stored rows".to_string(),
            });
        }

        let current = self.load_ownership(&asset)?;
        let audit = HistoryAudit::new(
            &asset,
            &entries,
            replayed.as_ref(),
            current.as_ref(),
            &self.config.sentinel,
        );
        if !audit.consistent {
            warn!(
                "[asset-ledger] {}: history replays to {:?} but current value is {:?}",
                asset, audit.replayed, audit.current
            );
        }
        Ok(audit)
    }

    fn is_known_asset(&self, asset: &str) -> bool {
        self.registry.is_known_asset(asset)
    }

    fn sentinel(&self) -> &str {
        &self.config.sentinel
    }
}
