//! Web dashboard command.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;

use super::Context;

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, default_value = "3030")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Also write logs to a file
    #[arg(long)]
    pub log: bool,

    /// Log file path (with --log)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// `<data dir>/ledger/serve.log`, or `ledger-serve.log` in the working directory.
pub fn default_log_file() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("ledger").join("serve.log"))
        .unwrap_or_else(|| PathBuf::from("ledger-serve.log"))
}

pub async fn execute(args: ServeArgs, ctx: Context) -> Result<()> {
    let api = Arc::new(ctx.client()?);

    println!();
    println!("  {} {}", "Decision Ledger".cyan().bold(), "Dashboard".bold());
    println!();
    println!(
        "  {}  http://{}:{}/dashboard",
        "Dashboard".green(),
        args.host,
        args.port
    );
    println!("  {}        {}", "API".green(), ctx.config.base_url());
    if ctx.config.session.is_none() {
        println!(
            "  {}",
            "No session configured; API calls will be unauthenticated.".yellow()
        );
    }
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    ledger_web::run_server(api, ctx.config, &args.host, args.port).await?;

    Ok(())
}
