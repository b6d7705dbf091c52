//! # History Ledger Entries
//!
//! Each committed transition appends one `HistoryEntry`. Entries for an asset
//! form a chain: `previous_hash` of entry `n` is the `hash` of entry `n - 1`
//! (all zeroes for the first), so a rewritten row breaks the chain.

use crate::domain::asset::AssetId;
use crate::domain::ownership::{Ownership, TransitionKind};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};
use std::fmt;

/// SHA3-256 digest of a history entry.
pub type EntryHash = [u8; 32];

/// `previous_hash` of the first entry of every asset.
pub const GENESIS_HASH: EntryHash = [0u8; 32];

/// One immutable ownership change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub asset: AssetId,
    /// Position in the asset's history, starting at 0.
    pub sequence: u64,
    pub kind: TransitionKind,
    /// `None` only when the first write hit an asset that was never initialized.
    pub previous: Option<Ownership>,
    pub new: Ownership,
    /// Generated by the ledger, never by the caller.
    pub timestamp: DateTime<Utc>,
    pub previous_hash: EntryHash,
    pub hash: EntryHash,
}

impl HistoryEntry {
    pub fn new(
        asset: AssetId,
        sequence: u64,
        kind: TransitionKind,
        previous: Option<Ownership>,
        new: Ownership,
        timestamp: DateTime<Utc>,
        previous_hash: EntryHash,
    ) -> Self {
        let mut entry = Self {
            asset,
            sequence,
            kind,
            previous,
            new,
            timestamp,
            previous_hash,
            hash: GENESIS_HASH,
        };
        entry.hash = entry.compute_hash();
        entry
    }

    pub fn compute_hash(&self) -> EntryHash {
        let mut hasher = Sha3_256::new();
        update_str(&mut hasher, self.asset.as_str());
        hasher.update(self.sequence.to_le_bytes());
        hasher.update([self.kind as u8]);
        update_ownership(&mut hasher, self.previous.as_ref());
        update_ownership(&mut hasher, Some(&self.new));
        hasher.update(self.timestamp.timestamp().to_le_bytes());
        hasher.update(self.timestamp.timestamp_subsec_nanos().to_le_bytes());
        hasher.update(self.previous_hash);
        hasher.finalize().into()
    }

    pub fn verify_hash(&self) -> bool {
        self.compute_hash() == self.hash
    }

    /// Host-facing representation with raw values and hex hashes.
    pub fn to_record(&self, sentinel: &str) -> HistoryRecord {
        HistoryRecord {
            asset: self.asset.to_string(),
            sequence: self.sequence,
            kind: self.kind,
            previous: self
                .previous
                .as_ref()
                .map(|ownership| ownership.as_value(sentinel).to_string()),
            new: self.new.as_value(sentinel).to_string(),
            timestamp: format_timestamp(&self.timestamp),
            previous_hash: hex::encode(self.previous_hash),
            hash: hex::encode(self.hash),
        }
    }
}

// Length-prefixed so that adjacent fields cannot run into each other.
fn update_str(hasher: &mut Sha3_256, value: &str) {
    hasher.update((value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}

fn update_ownership(hasher: &mut Sha3_256, ownership: Option<&Ownership>) {
    match ownership {
        None => hasher.update([0u8]),
        Some(Ownership::Available) => hasher.update([1u8]),
        Some(Ownership::CheckedOut(holder)) => {
            hasher.update([2u8]);
            update_str(hasher, holder.as_str());
        }
    }
}

/// RFC 3339, UTC, fixed nanosecond precision: sorts lexicographically.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// History entry as returned to host callers by `read_history`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub asset: String,
    pub sequence: u64,
    pub kind: TransitionKind,
    pub previous: Option<String>,
    pub new: String,
    pub timestamp: String,
    pub previous_hash: String,
    pub hash: String,
}

impl fmt::Display for HistoryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{}",
            self.previous.as_deref().unwrap_or(""),
            self.new,
            self.timestamp
        )
    }
}

/// Tail of an asset's history, stored next to the rows so appends need no scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryHead {
    pub next_sequence: u64,
    pub last_hash: EntryHash,
    pub last_timestamp: Option<DateTime<Utc>>,
}

impl HistoryHead {
    /// Timestamp for the next entry; never earlier than the last one.
    pub fn next_timestamp(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self.last_timestamp {
            Some(last) if last > now => last,
            _ => now,
        }
    }

    /// Build the next entry in the chain and advance the head past it.
    pub fn append(
        &mut self,
        asset: AssetId,
        kind: TransitionKind,
        previous: Option<Ownership>,
        new: Ownership,
        now: DateTime<Utc>,
    ) -> HistoryEntry {
        let timestamp = self.next_timestamp(now);
        let entry = HistoryEntry::new(
            asset,
            self.next_sequence,
            kind,
            previous,
            new,
            timestamp,
            self.last_hash,
        );
        self.next_sequence += 1;
        self.last_hash = entry.hash;
        self.last_timestamp = Some(timestamp);
        entry
    }
}

/// Where and why a history chain stopped verifying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainBreak {
    pub sequence: u64,
    pub reason: String,
}

/// Walk an asset's history in order and return the value it reproduces.
///
/// The walk starts from the `previous` value of the first entry (either no
/// value or the seeded available state) and checks sequence continuity, hash
/// links, entry hashes, monotonic timestamps and that every entry starts from
/// the value its predecessor left behind.
pub fn replay(entries: &[HistoryEntry]) -> Result<Option<Ownership>, ChainBreak> {
    let Some(first) = entries.first() else {
        return Ok(None);
    };

    if matches!(first.previous, Some(Ownership::CheckedOut(_))) {
        return Err(ChainBreak {
            sequence: first.sequence,
            reason: "history starts from a checked-out value".to_string(),
        });
    }

    let mut state = first.previous.clone();
    let mut expected_link = GENESIS_HASH;
    let mut last_timestamp: Option<DateTime<Utc>> = None;

    for (position, entry) in entries.iter().enumerate() {
        let fail = |reason: &str| ChainBreak {
            sequence: entry.sequence,
            reason: reason.to_string(),
        };

        if entry.sequence != position as u64 {
            return Err(fail("sequence gap"));
        }
        if entry.previous_hash != expected_link {
            return Err(fail("previous hash does not link to prior entry"));
        }
        if !entry.verify_hash() {
            return Err(fail("entry hash mismatch"));
        }
        if last_timestamp.is_some_and(|last| entry.timestamp < last) {
            return Err(fail("timestamp went backwards"));
        }
        if entry.previous != state {
            return Err(fail("previous value does not match replayed state"));
        }

        state = Some(entry.new.clone());
        expected_link = entry.hash;
        last_timestamp = Some(entry.timestamp);
    }

    Ok(state)
}

/// Result of auditing one asset's history against its current value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryAudit {
    pub asset: String,
    pub entries: u64,
    pub head_hash: String,
    /// Value the history reproduces; `None` when there is no history.
    pub replayed: Option<String>,
    /// Value currently stored; `None` when never initialized.
    pub current: Option<String>,
    pub consistent: bool,
}

impl HistoryAudit {
    pub fn new(
        asset: &AssetId,
        entries: &[HistoryEntry],
        replayed: Option<&Ownership>,
        current: Option<&Ownership>,
        sentinel: &str,
    ) -> Self {
        // A seeded asset with no transitions yet is consistent with empty history.
        let consistent = match (replayed, current) {
            (None, None) | (None, Some(Ownership::Available)) => true,
            (Some(replayed), Some(current)) => replayed == current,
            _ => false,
        };
        Self {
            asset: asset.to_string(),
            entries: entries.len() as u64,
            head_hash: hex::encode(entries.last().map_or(GENESIS_HASH, |e| e.hash)),
            replayed: replayed.map(|o| o.as_value(sentinel).to_string()),
            current: current.map(|o| o.as_value(sentinel).to_string()),
            consistent,
        }
    }
}
