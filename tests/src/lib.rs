//! # Asset Ledger Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/
//! │   └── ledger_benchmarks.rs   # Write / history throughput
//! └── src/integration/
//!     ├── scenarios.rs           # Lending flows through the command surface
//!     └── concurrency.rs         # Competing writers on shared assets
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p asset-ledger-tests
//! cargo test -p asset-ledger-tests integration::concurrency
//! cargo bench -p asset-ledger-tests
//! ```

pub mod integration;
