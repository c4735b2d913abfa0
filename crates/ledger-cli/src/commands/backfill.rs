//! Historical backfill command.

use anyhow::{bail, Result};
use colored::Colorize;
use ledger_core::view::settings::SettingsView;
use ledger_core::LedgerApi;

use super::Context;
use crate::output;

pub async fn execute(ctx: &Context) -> Result<()> {
    let api = ctx.client()?;
    run(&api).await
}

async fn run<A: LedgerApi + ?Sized>(api: &A) -> Result<()> {
    let mut view = SettingsView::new();
    view.load(api).await;
    if let Some(error) = view.error() {
        bail!("Failed to load workspace: {}", error);
    }

    if view.backfill_active() {
        println!(
            "{} {} (status: {})",
            "→".blue().bold(),
            view.backfill_button_label(),
            view.backfill_status_label()
        );
        return Ok(());
    }

    if view.trigger_backfill(api).await.is_err() {
        bail!(
            "Failed to start backfill: {}",
            view.error().unwrap_or("unknown error")
        );
    }
    output::success(&format!(
        "Backfill started (status: {})",
        view.backfill_status_label().cyan()
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_core::testing::{fixtures, MemoryApi};

    #[tokio::test]
    async fn test_backfill_starts_once() {
        let api = MemoryApi::new().with_workspace(fixtures::workspace());
        run(&api).await.unwrap();
        assert_eq!(api.workspace().unwrap().backfill_status.as_deref(), Some("running"));

        api.clear_requests();
        run(&api).await.unwrap();
        assert!(!api.requests().iter().any(|r| r.starts_with("POST")));
    }
}
