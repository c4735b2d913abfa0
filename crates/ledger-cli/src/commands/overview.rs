//! Analytics overview command.

use anyhow::{Context as _, Result};
use ledger_core::LedgerApi;

use super::Context;
use crate::output;

pub async fn execute(ctx: &Context) -> Result<()> {
    let api = ctx.client()?;
    let overview = api
        .analytics_overview()
        .await
        .context("Failed to load analytics")?;
    output::print_overview(&overview);
    Ok(())
}
