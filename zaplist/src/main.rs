//! `ZapList`: a personal task tracker.
//!
//! Runs one command against the task list and settings, then exits.
//! Configuration via CLI flags, environment variables, or config file
//! (`~/.config/zaplist/config.toml`).
//!
//! ```bash
//! cargo run --bin zaplist -- add "Buy milk" --description "2 liters"
//! cargo run --bin zaplist -- list --filter active
//! ZAPLIST_LOG=debug cargo run --bin zaplist -- theme toggle
//! ```

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;

use zaplist::cli::Session;
use zaplist::config::{AppConfig, Backend, CliArgs, Command};
use zaplist::storage::{FileStore, KeyValueStore, MemoryStore};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = CliArgs::parse();

    // Load and resolve configuration (CLI args > env > config file > defaults).
    let config = match AppConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config file: {e}");
            AppConfig::default()
        }
    };

    // Logs go to a file so command output on stdout stays clean.
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    let command = cli.command.unwrap_or(Command::List { filter: None });
    tracing::info!(backend = ?config.backend, data_dir = %config.data_dir.display(), "zaplist starting");

    match config.backend {
        Backend::File => {
            let kv = Arc::new(FileStore::new(config.data_dir.clone()));
            run(kv, config, command).await
        }
        Backend::Memory => run(Arc::new(MemoryStore::new()), config, command).await,
    }
}

/// Initialize file-based logging.
///
/// Returns a [`WorkerGuard`] that must be held until shutdown to ensure all
/// buffered log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("zaplist.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Opens a session over `kv` and runs `command`, printing the result.
async fn run<K: KeyValueStore + Clone>(kv: K, config: AppConfig, command: Command) -> ExitCode {
    let mut session = Session::open(kv, config).await;
    match session.execute(command).await {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
