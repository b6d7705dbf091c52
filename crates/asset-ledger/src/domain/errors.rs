//! # Domain Errors
//!
//! Error types for the asset ledger.
//!
//! Validation errors (`UnknownAsset`, `BadArgumentCount`, `IllegalTransition`,
//! `InvalidHolder`) are raised before any mutation. `StoreFailure` is terminal
//! and never retried by the ledger.

use crate::domain::ownership::Rejection;
use std::fmt;
use thiserror::Error;

/// Errors returned by ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Identifier is not in the registry.
    #[error("Unknown asset: {asset}")]
    UnknownAsset { asset: String },

    /// Asset is registered but has never been initialized or written.
    #[error("No ownership record for asset {asset}")]
    NotFound { asset: String },

    /// Wrong arity for a host command.
    #[error("Incorrect number of arguments for {function}: expected {expected}, got {actual}")]
    BadArgumentCount {
        function: String,
        expected: usize,
        actual: usize,
    },

    /// Host asked for a function this ledger does not expose.
    #[error("Received unknown function invocation: {function}")]
    UnknownFunction { function: String },

    /// Requested value violates the lending protocol.
    #[error("Illegal transition for {asset}: {current} -> {requested} ({rejection})")]
    IllegalTransition {
        asset: String,
        current: String,
        requested: String,
        rejection: Rejection,
    },

    /// Requested holder name is not a usable ownership value.
    #[error("Invalid holder for {asset}: {reason}")]
    InvalidHolder { asset: String, reason: &'static str },

    /// Underlying persistence failed; nothing was committed.
    #[error("Store failure: {0}")]
    StoreFailure(String),

    /// A query result could not be encoded for the host.
    #[error("Failed to encode response: {0}")]
    ResponseEncoding(String),

    /// Stored history does not form a valid chain.
    #[error("History corrupted for {asset} at sequence {sequence}: {reason}")]
    HistoryCorrupted {
        asset: String,
        sequence: u64,
        reason: String,
    },
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

impl LedgerError {
    pub fn unknown_asset(asset: impl Into<String>) -> Self {
        LedgerError::UnknownAsset {
            asset: asset.into(),
        }
    }

    /// True for errors raised before any mutation was attempted.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            LedgerError::UnknownAsset { .. }
                | LedgerError::NotFound { .. }
                | LedgerError::BadArgumentCount { .. }
                | LedgerError::UnknownFunction { .. }
                | LedgerError::IllegalTransition { .. }
                | LedgerError::InvalidHolder { .. }
        )
    }
}

/// Key-value store adapter errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KVStoreError {
    /// I/O error during read/write.
    IOError { message: String },
    /// Data corruption in the store.
    CorruptionError { message: String },
}

impl fmt::Display for KVStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KVStoreError::IOError { message } => write!(f, "KV store I/O error: {}", message),
            KVStoreError::CorruptionError { message } => {
                write!(f, "KV store corruption: {}", message)
            }
        }
    }
}

impl std::error::Error for KVStoreError {}

impl From<KVStoreError> for LedgerError {
    fn from(err: KVStoreError) -> Self {
        LedgerError::StoreFailure(err.to_string())
    }
}

impl From<bincode::Error> for LedgerError {
    fn from(err: bincode::Error) -> Self {
        LedgerError::StoreFailure(format!("serialization error: {}", err))
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::ResponseEncoding(err.to_string())
    }
}

/// Configuration errors, raised while building the registry or the service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Asset registry must contain at least one asset")]
    EmptyRegistry,

    #[error("Invalid asset identifier {asset:?}: {reason}")]
    InvalidAssetId { asset: String, reason: &'static str },

    #[error("Duplicate asset identifier: {asset}")]
    DuplicateAsset { asset: String },

    #[error("Unknown asset category: {value}")]
    InvalidCategory { value: String },

    #[error("Malformed inventory entry {entry:?}, expected id:category")]
    MalformedInventory { entry: String },

    #[error("Sentinel value must not be empty")]
    EmptySentinel,

    #[error("Sentinel value {sentinel:?} collides with a registered asset")]
    SentinelIsAsset { sentinel: String },
}
