//! Search command.

use anyhow::{bail, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use ledger_core::search::IDLE_PROMPT;
use ledger_core::view::search::SearchView;
use ledger_core::LedgerApi;
use std::time::Duration;

use super::Context;
use crate::output;

#[derive(Args)]
pub struct SearchArgs {
    /// Question to ask, e.g. "why did we pick Kafka?"
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Number of ranked decisions to return (defaults to the configured value)
    #[arg(short, long)]
    pub limit: Option<u32>,
}

pub async fn execute(args: SearchArgs, ctx: &Context) -> Result<()> {
    let api = ctx.client()?;
    let limit = args.limit.unwrap_or(ctx.config.search_limit);
    let view = run(&api, &args.query.join(" "), limit, true).await?;
    if let Some(result) = view.result() {
        output::print_search_result(result);
    }
    Ok(())
}

async fn run<A: LedgerApi + ?Sized>(
    api: &A,
    query: &str,
    limit: u32,
    show_spinner: bool,
) -> Result<SearchView> {
    let mut view = SearchView::new(limit);
    view.set_query(query);
    if !view.can_submit() {
        bail!("{}", IDLE_PROMPT);
    }

    let spinner = show_spinner.then(|| {
        let bar = ProgressBar::new_spinner();
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message("Searching decisions...");
        bar
    });

    view.submit(api).await;

    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }
    if let Some(error) = view.error() {
        bail!("Search failed: {}", error);
    }
    Ok(view)
}
