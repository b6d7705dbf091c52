//! # Integration Tests
//!
//! Cross-crate flows: the ledger core driven through `CommandDispatcher` and
//! the runtime shell, plus concurrent writers.

pub mod concurrency;
pub mod scenarios;
