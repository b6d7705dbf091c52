//! # Asset Ledger Runtime
//!
//! Process entry point: configure logging, build the ledger, seed the
//! inventory and serve the line protocol on stdin until EOF or Ctrl+C.
//!
//! Responses go to stdout, logs to stderr.

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use ledger_runtime::config::RuntimeConfig;
use ledger_runtime::shell::{self, Reply};
use ledger_runtime::LedgerRuntime;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = RuntimeConfig::from_env().context("Invalid configuration")?;
    let runtime = LedgerRuntime::new(config)?;
    let report = runtime.start()?;
    info!(
        "[ledger-runtime] boot: {} seeded, {} still checked out, {} available",
        report.seeded, report.retained, report.unchanged
    );
    info!("Ledger is running. Type `help` for commands, Ctrl+C to stop.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("Failed to read stdin")?,
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl+C received");
                break;
            }
        };
        let Some(line) = line else {
            info!("stdin closed");
            break;
        };

        let dispatcher = runtime.dispatcher().clone();
        let reply = tokio::task::spawn_blocking(move || shell::execute(&dispatcher, &line))
            .await
            .context("Command task panicked")?;

        match reply {
            Reply::Silent => {}
            Reply::Quit => break,
            Reply::Text(text) => {
                stdout.write_all(text.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
                stdout.flush().await?;
            }
        }
    }

    if let Err(e) = stdout.flush().await {
        warn!("Failed to flush stdout: {}", e);
    }
    info!("Ledger runtime stopped");
    Ok(())
}
