//! Command dispatcher.
//!
//! Routes host commands to an `AssetLedgerApi` and encodes the response
//! payload: raw value bytes for `read`, JSON for history queries, empty for
//! mutations.

use super::command::{functions, Command};
use crate::domain::errors::{LedgerError, LedgerResult};
use crate::domain::history::HistoryRecord;
use crate::ports::inbound::AssetLedgerApi;
use std::sync::Arc;
use tracing::debug;

/// Thin adapter between a hosting runtime and the ledger.
pub struct CommandDispatcher<A: AssetLedgerApi> {
    ledger: Arc<A>,
}

impl<A: AssetLedgerApi> Clone for CommandDispatcher<A> {
    fn clone(&self) -> Self {
        Self {
            ledger: Arc::clone(&self.ledger),
        }
    }
}

impl<A: AssetLedgerApi> CommandDispatcher<A> {
    pub fn new(ledger: Arc<A>) -> Self {
        Self { ledger }
    }

    pub fn ledger(&self) -> &Arc<A> {
        &self.ledger
    }

    /// Mutating entry point: `init` and `write`.
    pub fn invoke<S: AsRef<str>>(&self, function: &str, args: &[S]) -> LedgerResult<Vec<u8>> {
        if !functions::INVOKE.iter().any(|f| *f == function) {
            return Err(LedgerError::UnknownFunction {
                function: function.to_string(),
            });
        }
        self.dispatch(Command::parse(function, args)?)
    }

    /// Read-only entry point: `read`, `read_history` and `verify_history`.
    pub fn query<S: AsRef<str>>(&self, function: &str, args: &[S]) -> LedgerResult<Vec<u8>> {
        if !functions::QUERY.iter().any(|f| *f == function) {
            return Err(LedgerError::UnknownFunction {
                function: function.to_string(),
            });
        }
        self.dispatch(Command::parse(function, args)?)
    }

    /// Execute an already parsed command.
    pub fn dispatch(&self, command: Command) -> LedgerResult<Vec<u8>> {
        debug!("[asset-ledger] dispatch {:?}", command);

        match command {
            Command::Init => {
                self.ledger.init()?;
                Ok(Vec::new())
            }
            Command::Write { asset, value } => {
                self.ledger.write(&asset, &value)?;
                Ok(Vec::new())
            }
            Command::Read { asset } => {
                let ownership = self.ledger.read(&asset)?;
                Ok(ownership
                    .as_value(self.ledger.sentinel())
                    .as_bytes()
                    .to_vec())
            }
            Command::ReadHistory { asset } => {
                let sentinel = self.ledger.sentinel();
                let records: Vec<HistoryRecord> = self
                    .ledger
                    .read_history(&asset)?
                    .iter()
                    .map(|entry| entry.to_record(sentinel))
                    .collect();
                Ok(serde_json::to_vec(&records)?)
            }
            Command::VerifyHistory { asset } => {
                let audit = self.ledger.verify_history(&asset)?;
                Ok(serde_json::to_vec(&audit)?)
            }
        }
    }
}
