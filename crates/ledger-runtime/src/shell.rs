//! # Command Shell
//!
//! Line protocol spoken on stdin:
//!
//! ```text
//! invoke init
//! invoke write pc_a alice
//! query read pc_a
//! read_history pc_a          # path inferred from the function name
//! help | quit
//! ```
//!
//! Every line produces one response line: `ok`, `ok <payload>` or
//! `error: <message>`.

use asset_ledger::ipc::functions;
use asset_ledger::{AssetLedgerApi, CommandDispatcher, LedgerResult};
use tracing::{error, warn};

pub const HELP: &str = "commands: [invoke] init | [invoke] write <asset> <value> | \
[query] read <asset> | [query] read_history <asset> | [query] verify_history <asset> | help | quit";

/// Which dispatcher entry point a line is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Path {
    Invoke,
    Query,
}

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellLine {
    Empty,
    Help,
    Quit,
    Call {
        path: Path,
        function: String,
        args: Vec<String>,
    },
}

impl ShellLine {
    pub fn parse(line: &str) -> Self {
        let mut words = line.split_whitespace();
        let Some(first) = words.next() else {
            return ShellLine::Empty;
        };

        let (path, function) = match first {
            "help" | "?" => return ShellLine::Help,
            "quit" | "exit" => return ShellLine::Quit,
            "invoke" => (Path::Invoke, words.next().unwrap_or_default()),
            "query" => (Path::Query, words.next().unwrap_or_default()),
            other if functions::QUERY.iter().any(|f| *f == other) => (Path::Query, other),
            other => (Path::Invoke, other),
        };

        ShellLine::Call {
            path,
            function: function.to_string(),
            args: words.map(str::to_string).collect(),
        }
    }
}

/// Result of running one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Silent,
    Quit,
    Text(String),
}

/// Run one input line against the dispatcher and format the response.
pub fn execute<A: AssetLedgerApi>(dispatcher: &CommandDispatcher<A>, line: &str) -> Reply {
    match ShellLine::parse(line) {
        ShellLine::Empty => Reply::Silent,
        ShellLine::Quit => Reply::Quit,
        ShellLine::Help => Reply::Text(HELP.to_string()),
        ShellLine::Call {
            path,
            function,
            args,
        } => {
            let result = match path {
                Path::Invoke => dispatcher.invoke(&function, &args[..]),
                Path::Query => dispatcher.query(&function, &args[..]),
            };
            Reply::Text(format_response(&function, result))
        }
    }
}

fn format_response(function: &str, result: LedgerResult<Vec<u8>>) -> String {
    match result {
        Ok(payload) if payload.is_empty() => "ok".to_string(),
        Ok(payload) => format!("ok {}", String::from_utf8_lossy(&payload)),
        Err(e) => {
            if e.is_validation() {
                warn!("[ledger-runtime] {} rejected: {}", function, e);
            } else {
                error!("[ledger-runtime] {} failed: {}", function, e);
            }
            format!("error: {}", e)
        }
    }
}
