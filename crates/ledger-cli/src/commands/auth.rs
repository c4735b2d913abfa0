//! Sign-in commands.
//!
//! Sign-in happens in the browser through Slack OAuth; the resulting
//! session token is stored in the config file for later commands.

use anyhow::{bail, Context as _, Result};
use clap::Subcommand;
use colored::Colorize;
use ledger_core::Config;
use std::path::Path;

use super::Context;
use crate::output;

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Print the Slack sign-in URL
    Url,

    /// Store a session token in the config file
    Login {
        /// Session token (the value of the `session` cookie)
        token: String,
    },

    /// Remove the stored session token
    Logout,
}

pub fn execute(cmd: AuthCommands, ctx: &Context) -> Result<()> {
    match cmd {
        AuthCommands::Url => {
            println!("Open this URL in your browser to sign in with Slack:");
            println!();
            println!("  {}", ctx.config.slack_auth_url().cyan().underline());
            println!();
            println!(
                "{}",
                "Then run 'ledger auth login <token>' with the session cookie value.".dimmed()
            );
        }

        AuthCommands::Login { token } => {
            let token = token.trim();
            if token.is_empty() {
                bail!("Session token must not be blank");
            }
            let path = config_path(ctx)?;
            store_session(path, Some(token))?;
            output::success(&format!("Session saved to {}", path.display()));
        }

        AuthCommands::Logout => {
            let path = config_path(ctx)?;
            store_session(path, None)?;
            output::success("Signed out");
        }
    }
    Ok(())
}

fn config_path(ctx: &Context) -> Result<&Path> {
    ctx.config_path
        .as_deref()
        .context("No config directory found; pass --config <path>")
}

/// Rewrite the file config with a new session, keeping its other settings.
///
/// Environment and flag overrides are not written back.
fn store_session(path: &Path, session: Option<&str>) -> Result<()> {
    let mut config = if path.exists() {
        Config::from_file(path).with_context(|| format!("Failed to read {}", path.display()))?
    } else {
        Config::default()
    };
    config.session = session.map(str::to_string);
    config
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
