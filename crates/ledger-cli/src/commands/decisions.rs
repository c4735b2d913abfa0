//! Decision commands.

use anyhow::{bail, Context as _, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use dialoguer::Confirm;
use ledger_core::decision::model::{DecisionStatus, DecisionUpdate};
use ledger_core::decision::{format_decisions_summary, DecisionAction, DecisionFilters};
use ledger_core::view::decisions::{DecisionListView, EMPTY_MESSAGE};
use ledger_core::LedgerApi;

use super::Context;
use crate::output;

#[derive(Subcommand)]
pub enum DecisionCommands {
    /// List decisions
    List(ListArgs),

    /// Show a decision with its links
    Show {
        /// Decision ID
        id: String,
    },

    /// Confirm a pending decision
    Confirm {
        /// Decision ID
        id: String,
    },

    /// Ignore a pending decision
    Ignore {
        /// Decision ID
        id: String,
    },

    /// Edit a decision's fields
    Update(UpdateArgs),

    /// Delete a decision
    Delete {
        /// Decision ID
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Args, Default)]
pub struct ListArgs {
    /// Status (pending, active, ignored, expired)
    #[arg(short, long)]
    pub status: Option<String>,

    /// Category (architecture, schema, api, ...)
    #[arg(short, long)]
    pub category: Option<String>,

    /// Tag
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Owner Slack user ID
    #[arg(long)]
    pub owner: Option<String>,

    /// Source Slack channel ID
    #[arg(long)]
    pub channel: Option<String>,

    /// Only decisions created on or after this date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Only decisions created on or before this date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,

    /// Page number
    #[arg(short, long, default_value = "1")]
    pub page: u32,

    /// Decisions per page (defaults to the configured value)
    #[arg(long)]
    pub per_page: Option<u32>,

    /// Print a short markdown digest instead of a table
    #[arg(long)]
    pub markdown: bool,
}

#[derive(Args)]
pub struct UpdateArgs {
    /// Decision ID
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub summary: Option<String>,

    #[arg(long)]
    pub rationale: Option<String>,

    /// Comma-separated tags (replaces existing tags)
    #[arg(long, value_delimiter = ',')]
    pub tags: Option<Vec<String>>,

    /// Comma-separated impact areas
    #[arg(long, value_delimiter = ',')]
    pub impact: Option<Vec<String>>,

    #[arg(long)]
    pub category: Option<String>,

    /// New status
    #[arg(long)]
    pub status: Option<String>,
}

impl ListArgs {
    fn filters(&self) -> Result<DecisionFilters> {
        Ok(DecisionFilters {
            status: self.status.as_deref().map(parse_status).transpose()?,
            category: self.category.clone(),
            tag: self.tag.clone(),
            owner_slack_id: self.owner.clone(),
            channel_id: self.channel.clone(),
            date_from: self.from.clone(),
            date_to: self.to.clone(),
        })
    }
}

impl UpdateArgs {
    fn update(&self) -> Result<DecisionUpdate> {
        let trimmed = |tags: &Vec<String>| -> Vec<String> {
            tags.iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect()
        };
        Ok(DecisionUpdate {
            title: self.title.clone(),
            summary: self.summary.clone(),
            rationale: self.rationale.clone(),
            tags: self.tags.as_ref().map(trimmed),
            impact_area: self.impact.as_ref().map(trimmed),
            category: self.category.clone(),
            status: self.status.as_deref().map(parse_status).transpose()?,
        })
    }
}

fn parse_status(raw: &str) -> Result<DecisionStatus> {
    match DecisionStatus::parse(raw) {
        DecisionStatus::Unknown => bail!(
            "Unknown status '{}'. Expected one of: pending, active, ignored, expired",
            raw
        ),
        status => Ok(status),
    }
}

pub async fn execute(cmd: DecisionCommands, ctx: &Context) -> Result<()> {
    let api = ctx.client()?;
    run(cmd, &api, ctx.config.per_page).await
}

async fn run<A: LedgerApi + ?Sized>(cmd: DecisionCommands, api: &A, per_page: u32) -> Result<()> {
    match cmd {
        DecisionCommands::List(args) => {
            let mut view = DecisionListView::restore(
                args.filters()?,
                args.page,
                args.per_page.unwrap_or(per_page),
            );
            view.refresh(api).await;
            if let Some(error) = view.error() {
                bail!("Failed to list decisions: {}", error);
            }

            if args.markdown {
                print!("{}", format_decisions_summary(view.decisions()));
            } else {
                output::print_decisions_table(view.decisions(), &view.pagination(), EMPTY_MESSAGE);
            }
        }

        DecisionCommands::Show { id } => {
            let detail = api
                .get_decision(&id)
                .await
                .with_context(|| format!("Failed to load decision {}", id))?;
            output::print_decision(&detail);
        }

        DecisionCommands::Confirm { id } => act(api, &id, DecisionAction::Confirm).await?,

        DecisionCommands::Ignore { id } => act(api, &id, DecisionAction::Ignore).await?,

        DecisionCommands::Update(args) => {
            let update = args.update()?;
            if update.is_empty() {
                bail!("Nothing to update. Pass at least one field, e.g. --title");
            }
            let decision = api
                .update_decision(&args.id, &update)
                .await
                .with_context(|| format!("Failed to update decision {}", args.id))?;
            output::success(&format!("Updated decision: {}", decision.title.cyan()));
        }

        DecisionCommands::Delete { id, yes } => {
            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Delete decision {}?", id))
                    .default(false)
                    .interact()?;
                if !confirmed {
                    println!("{}", "Cancelled.".dimmed());
                    return Ok(());
                }
            }
            api.delete_decision(&id)
                .await
                .with_context(|| format!("Failed to delete decision {}", id))?;
            output::success(&format!("Deleted decision {}", id.dimmed()));
        }
    }

    Ok(())
}

/// Confirm or ignore, refusing when the decision is no longer pending.
async fn act<A: LedgerApi + ?Sized>(api: &A, id: &str, action: DecisionAction) -> Result<()> {
    let detail = api
        .get_decision(id)
        .await
        .with_context(|| format!("Failed to load decision {}", id))?;
    let status = detail.decision.status;
    if !DecisionAction::allowed_for(status).contains(&action) {
        bail!(
            "Decision {} is {}; only pending decisions can be confirmed or ignored",
            id,
            status
        );
    }

    let decision = api
        .decision_action(id, action)
        .await
        .with_context(|| format!("Failed to {} decision {}", action.as_str(), id))?;
    output::success(&format!(
        "{}: {} is now {}",
        action.label(),
        decision.title.cyan(),
        decision.status
    ));
    Ok(())
}
