//! CLI command definitions and handlers.

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use ledger_core::config::{API_URL_ENV, SESSION_ENV};
use ledger_core::{Config, HttpClient, LedgerError};
use std::path::PathBuf;

pub mod auth;
pub mod backfill;
pub mod channels;
pub mod decisions;
pub mod health;
pub mod integrations;
pub mod overview;
pub mod search;
pub mod serve;
pub mod workspace;

/// Decision Ledger - Team decisions captured from Slack
#[derive(Parser)]
#[command(name = "ledger")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Base URL of the ledger API
    #[arg(long, global = true, env = API_URL_ENV)]
    pub api_url: Option<String>,

    /// Session token sent as the `session` cookie
    #[arg(long, global = true, env = SESSION_ENV, hide_env_values = true)]
    pub session: Option<String>,

    /// Path to the config file (defaults to the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show headline analytics
    Overview,

    /// Browse and curate decisions
    #[command(subcommand)]
    Decisions(decisions::DecisionCommands),

    /// Ask a question about your team's decisions
    Search(search::SearchArgs),

    /// Workspace profile and settings
    #[command(subcommand)]
    Workspace(workspace::WorkspaceCommands),

    /// Monitored Slack channels
    #[command(subcommand)]
    Channels(channels::ChannelCommands),

    /// Connect Jira or GitHub
    #[command(subcommand)]
    Integrations(integrations::IntegrationCommands),

    /// Start a historical scan of monitored channels
    Backfill,

    /// Sign in and out
    #[command(subcommand)]
    Auth(auth::AuthCommands),

    /// Check that the API is reachable
    Health,

    /// Serve the web dashboard
    Serve(serve::ServeArgs),
}

/// Resolved settings shared by every command.
pub struct Context {
    pub config: Config,
    pub config_path: Option<PathBuf>,
}

impl Context {
    /// HTTP client for the configured API and session.
    pub fn client(&self) -> Result<HttpClient> {
        HttpClient::new(&self.config).context("Failed to build HTTP client")
    }
}

/// True when the API rejected the session anywhere in the error chain.
pub fn session_rejected(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<LedgerError>())
        .any(LedgerError::is_unauthorized)
}

/// Default config file location: `<config dir>/ledger/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("ledger").join("config.toml"))
}

impl Cli {
    fn context(&self) -> Result<Context> {
        let config_path = self.config.clone().or_else(default_config_path);
        let mut config = Config::load(config_path.as_deref())
            .with_context(|| match &config_path {
                Some(p) => format!("Failed to load config from {}", p.display()),
                None => "Failed to load config".to_string(),
            })?;

        if let Some(url) = self.api_url.as_deref().filter(|u| !u.trim().is_empty()) {
            config.api_url = url.to_string();
        }
        if let Some(session) = self.session.as_deref().filter(|s| !s.trim().is_empty()) {
            config.session = Some(session.to_string());
        }
        config.validate()?;
        tracing::debug!(
            api_url = %config.base_url(),
            has_session = config.session.is_some(),
            "Resolved configuration"
        );

        Ok(Context { config, config_path })
    }

    pub async fn execute(self) -> Result<()> {
        let ctx = self.context()?;

        match self.command {
            Commands::Overview => overview::execute(&ctx).await,
            Commands::Decisions(cmd) => decisions::execute(cmd, &ctx).await,
            Commands::Search(args) => search::execute(args, &ctx).await,
            Commands::Workspace(cmd) => workspace::execute(cmd, &ctx).await,
            Commands::Channels(cmd) => channels::execute(cmd, &ctx).await,
            Commands::Integrations(cmd) => integrations::execute(cmd, &ctx).await,
            Commands::Backfill => backfill::execute(&ctx).await,
            Commands::Auth(cmd) => auth::execute(cmd, &ctx),
            Commands::Health => health::execute(&ctx).await,
            Commands::Serve(args) => serve::execute(args, ctx).await,
        }
    }
}
