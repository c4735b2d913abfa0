//! API health check.

use anyhow::{Context as _, Result};
use colored::Colorize;
use ledger_core::LedgerApi;

use super::Context;

pub async fn execute(ctx: &Context) -> Result<()> {
    let api = ctx.client()?;
    let health = api
        .health()
        .await
        .with_context(|| format!("API at {} is not reachable", api.base_url()))?;
    println!(
        "{} {} {}",
        "●".green(),
        api.base_url().bold(),
        health.status.green()
    );
    Ok(())
}
