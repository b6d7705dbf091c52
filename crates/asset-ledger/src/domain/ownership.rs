//! # Ownership and the Lending State Machine
//!
//! ```text
//!                 checkout(holder)
//!   [AVAILABLE] ──────────────────→ [CHECKED_OUT(holder)]
//!        ↑                                   │
//!        └────────────── return ─────────────┘
//!
//!   AVAILABLE   + sentinel -> rejected (nothing to return)
//!   CHECKED_OUT + holder   -> rejected (no re-lending, no self-renewal)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Value written to an asset to mark it as held by the custodian.
pub const DEFAULT_SENTINEL: &str = "available";

/// Name of the party holding a checked-out asset. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Holder(String);

impl Holder {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Holder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Current ownership of an asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ownership {
    Available,
    CheckedOut(Holder),
}

impl Ownership {
    /// Interpret a raw value: the sentinel means available, anything else is a holder.
    pub fn from_value(value: &str, sentinel: &str) -> Result<Self, &'static str> {
        if value == sentinel {
            Ok(Ownership::Available)
        } else if value.is_empty() {
            Err("holder must not be empty")
        } else {
            Ok(Ownership::CheckedOut(Holder(value.to_string())))
        }
    }

    pub fn checked_out(holder: impl Into<String>) -> Self {
        Ownership::CheckedOut(Holder(holder.into()))
    }

    /// Raw value as seen by host callers.
    pub fn as_value<'a>(&'a self, sentinel: &'a str) -> &'a str {
        match self {
            Ownership::Available => sentinel,
            Ownership::CheckedOut(holder) => holder.as_str(),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Ownership::Available)
    }

    pub fn holder(&self) -> Option<&Holder> {
        match self {
            Ownership::Available => None,
            Ownership::CheckedOut(holder) => Some(holder),
        }
    }
}

impl fmt::Display for Ownership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ownership::Available => f.write_str("AVAILABLE"),
            Ownership::CheckedOut(holder) => write!(f, "CHECKED_OUT({})", holder),
        }
    }
}

/// What kind of change a history entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    /// First value ever written to an asset that was never initialized.
    Establish,
    /// Available -> holder.
    Checkout,
    /// Holder -> available.
    Return,
    /// Holder -> available, forced by re-initialization.
    Reclaim,
    /// Accepted without the lending rules (transition checks disabled).
    Unchecked,
}

/// Why a requested transition was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("cannot return an asset that is not checked out")]
    AlreadyAvailable,

    #[error("asset is already checked out")]
    AlreadyCheckedOut,

    #[error("holder cannot renew a checkout")]
    SelfRenewal,
}

/// Evaluate the lending table for `current -> requested`.
///
/// `current == None` means the store holds no value for the asset yet; the
/// first write establishes the initial state unconditionally.
pub fn evaluate(
    current: Option<&Ownership>,
    requested: &Ownership,
) -> Result<TransitionKind, Rejection> {
    match (current, requested) {
        (None, _) => Ok(TransitionKind::Establish),
        (Some(Ownership::Available), Ownership::Available) => Err(Rejection::AlreadyAvailable),
        (Some(Ownership::Available), Ownership::CheckedOut(_)) => Ok(TransitionKind::Checkout),
        (Some(Ownership::CheckedOut(_)), Ownership::Available) => Ok(TransitionKind::Return),
        (Some(Ownership::CheckedOut(held)), Ownership::CheckedOut(wanted)) if held == wanted => {
            Err(Rejection::SelfRenewal)
        }
        (Some(Ownership::CheckedOut(_)), Ownership::CheckedOut(_)) => {
            Err(Rejection::AlreadyCheckedOut)
        }
    }
}
