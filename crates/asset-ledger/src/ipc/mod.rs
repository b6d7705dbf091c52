//! # IPC Module
//!
//! Host-facing command surface for the asset ledger.
//!
//! The hosting runtime hands over a function name plus positional string
//! arguments. Mutating functions go through `invoke`, read-only ones through
//! `query`; a function sent down the wrong path is treated as unknown.
//!
//! ## Modules
//!
//! - `command`: Typed `Command` and argument-count checking
//! - `dispatcher`: `CommandDispatcher` routing commands to `AssetLedgerApi`

pub mod command;
pub mod dispatcher;

pub use command::{functions, Command};
pub use dispatcher::CommandDispatcher;
