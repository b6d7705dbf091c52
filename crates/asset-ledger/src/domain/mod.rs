//! # Domain Layer
//!
//! Pure domain logic for the asset ledger.
//!
//! ## Modules
//!
//! - `asset` - Asset identifiers, categories and the closed registry
//! - `ownership` - Ownership values and the lending state machine
//! - `history` - Hash-linked history entries and replay
//! - `config` - Ledger configuration, policy switches and key layout
//! - `errors` - Domain error types

pub mod asset;
pub mod config;
pub mod errors;
pub mod history;
pub mod ownership;
