//! Decision Ledger CLI
//!
//! Browse, search and curate team decisions, and serve the web dashboard.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

use commands::{Cli, Commands};

/// Initialize tracing with optional file logging.
///
/// Console output goes to stderr so command output on stdout stays clean.
/// The returned guard flushes the file writer and must live until exit.
fn init_tracing(log_file: Option<&std::path::Path>, verbose: bool) -> Option<WorkerGuard> {
    let default_filter = if verbose {
        "ledger=debug,ledger_web=debug,ledger_core=debug"
    } else {
        "ledger=info,ledger_web=debug,ledger_core=info"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let console = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    if let Some(path) = log_file {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        match std::fs::OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                let (writer, guard) = tracing_appender::non_blocking(file);
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(console)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .with_writer(writer)
                            .with_ansi(false),
                    )
                    .init();
                return Some(guard);
            }
            Err(e) => eprintln!("Cannot open log file {}: {}", path.display(), e),
        }
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console)
        .init();
    None
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_file = match &cli.command {
        Commands::Serve(args) if args.log => Some(
            args.log_file
                .clone()
                .unwrap_or_else(commands::serve::default_log_file),
        ),
        _ => None,
    };

    let _guard = init_tracing(log_file.as_deref(), cli.verbose);

    let result = cli.execute().await;
    if let Err(e) = &result {
        if commands::session_rejected(e) {
            eprintln!(
                "{}",
                "Session rejected. Run 'ledger auth url' to sign in again.".yellow()
            );
        }
    }
    result
}
