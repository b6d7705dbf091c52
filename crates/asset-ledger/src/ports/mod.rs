//! # Ports
//!
//! - `inbound` - The ledger API exposed to hosts
//! - `outbound` - Store and clock dependencies the host must provide

pub mod inbound;
pub mod outbound;
