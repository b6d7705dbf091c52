//! # Adapters
//!
//! - `memory` - In-memory key-value store
//! - `time` - System and manual clocks

pub mod memory;
pub mod time;

pub use memory::InMemoryKVStore;
pub use time::{ManualTimeSource, SystemTimeSource};
