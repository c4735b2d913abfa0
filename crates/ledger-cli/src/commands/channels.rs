//! Monitored channel commands.

use anyhow::{bail, Context as _, Result};
use clap::Subcommand;
use colored::Colorize;
use ledger_core::view::settings::SettingsView;
use ledger_core::LedgerApi;

use super::Context;
use crate::output;

#[derive(Subcommand)]
pub enum ChannelCommands {
    /// List monitored channels
    List,

    /// Start monitoring a channel
    Add {
        /// Slack channel ID, e.g. C01234ABCD
        channel_id: String,

        /// Channel name for display
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Stop monitoring a channel
    Remove {
        /// Slack channel ID
        channel_id: String,
    },
}

pub async fn execute(cmd: ChannelCommands, ctx: &Context) -> Result<()> {
    let api = ctx.client()?;
    run(cmd, &api).await
}

async fn run<A: LedgerApi + ?Sized>(cmd: ChannelCommands, api: &A) -> Result<()> {
    match cmd {
        ChannelCommands::List => {
            let channels = api.list_channels().await.context("Failed to list channels")?;
            output::print_channels(&channels);
        }

        ChannelCommands::Add { channel_id, name } => {
            let mut view = SettingsView::new();
            view.new_channel_id = channel_id;
            view.new_channel_name = name.unwrap_or_default();
            match view.add_channel(api).await {
                Ok(Some(channel)) => output::success(&format!(
                    "Now monitoring {} ({})",
                    channel.display_name().cyan(),
                    channel.channel_id.dimmed()
                )),
                Ok(None) => bail!("Channel ID must not be blank"),
                Err(e) => return Err(e).context("Failed to add channel"),
            }
        }

        ChannelCommands::Remove { channel_id } => {
            let mut view = SettingsView::new();
            view.remove_channel(api, &channel_id)
                .await
                .with_context(|| format!("Failed to remove channel {}", channel_id))?;
            output::success(&format!("Stopped monitoring {}", channel_id.dimmed()));
        }
    }
    Ok(())
}
