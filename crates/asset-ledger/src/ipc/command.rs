//! Typed host commands.

use crate::domain::errors::{LedgerError, LedgerResult};

/// Function names accepted from the host.
pub mod functions {
    pub const INIT: &str = "init";
    pub const WRITE: &str = "write";
    pub const READ: &str = "read";
    pub const READ_HISTORY: &str = "read_history";
    pub const VERIFY_HISTORY: &str = "verify_history";

    /// Functions that mutate the ledger.
    pub const INVOKE: &[&str] = &[INIT, WRITE];
    /// Functions that only read.
    pub const QUERY: &[&str] = &[READ, READ_HISTORY, VERIFY_HISTORY];
}

/// One parsed ledger command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Init,
    Write { asset: String, value: String },
    Read { asset: String },
    ReadHistory { asset: String },
    VerifyHistory { asset: String },
}

impl Command {
    /// Build a command from a function name and its positional arguments.
    ///
    /// Extra or missing arguments fail with `BadArgumentCount`; names outside
    /// the known set fail with `UnknownFunction`.
    pub fn parse<S: AsRef<str>>(function: &str, args: &[S]) -> LedgerResult<Self> {
        let expected = match function {
            functions::INIT => 0,
            functions::WRITE => 2,
            functions::READ | functions::READ_HISTORY | functions::VERIFY_HISTORY => 1,
            _ => {
                return Err(LedgerError::UnknownFunction {
                    function: function.to_string(),
                })
            }
        };

        if args.len() != expected {
            return Err(LedgerError::BadArgumentCount {
                function: function.to_string(),
                expected,
                actual: args.len(),
            });
        }

        let arg = |i: usize| args[i].as_ref().to_string();
        Ok(match function {
            functions::INIT => Command::Init,
            functions::WRITE => Command::Write {
                asset: arg(0),
                value: arg(1),
            },
            functions::READ => Command::Read { asset: arg(0) },
            functions::READ_HISTORY => Command::ReadHistory { asset: arg(0) },
            _ => Command::VerifyHistory { asset: arg(0) },
        })
    }

    /// Host function name of this command.
    pub fn function(&self) -> &'static str {
        match self {
            Command::Init => functions::INIT,
            Command::Write { .. } => functions::WRITE,
            Command::Read { .. } => functions::READ,
            Command::ReadHistory { .. } => functions::READ_HISTORY,
            Command::VerifyHistory { .. } => functions::VERIFY_HISTORY,
        }
    }
}
