//! Jira and GitHub integration commands.

use anyhow::{Context as _, Result};
use clap::Subcommand;
use ledger_core::view::settings::SettingsView;
use ledger_core::workspace::model::{GitHubCredentials, JiraCredentials};
use ledger_core::LedgerApi;

use super::Context;
use crate::output;

#[derive(Subcommand)]
pub enum IntegrationCommands {
    /// Connect a Jira site
    Jira {
        /// Jira domain, e.g. acme.atlassian.net
        #[arg(long)]
        domain: String,

        /// Account email
        #[arg(long)]
        email: String,

        /// API token
        #[arg(long, env = "LEDGER_JIRA_TOKEN", hide_env_values = true)]
        token: String,
    },

    /// Connect a GitHub repository
    Github {
        /// Organization or user
        #[arg(long)]
        org: String,

        /// Repository name
        #[arg(long)]
        repo: String,

        /// Access token
        #[arg(long, env = "LEDGER_GITHUB_TOKEN", hide_env_values = true)]
        token: String,
    },
}

pub async fn execute(cmd: IntegrationCommands, ctx: &Context) -> Result<()> {
    let api = ctx.client()?;
    run(cmd, &api).await
}

async fn run<A: LedgerApi + ?Sized>(cmd: IntegrationCommands, api: &A) -> Result<()> {
    let mut view = SettingsView::new();
    match cmd {
        IntegrationCommands::Jira { domain, email, token } => {
            let credentials = JiraCredentials {
                domain: domain.trim().to_string(),
                email: email.trim().to_string(),
                api_token: token,
            };
            view.connect_jira(api, &credentials)
                .await
                .context("Failed to connect Jira")?;
            output::success(&format!("Jira connected ({})", credentials.domain));
        }

        IntegrationCommands::Github { org, repo, token } => {
            let credentials = GitHubCredentials {
                org: org.trim().to_string(),
                repo: repo.trim().to_string(),
                token,
            };
            view.connect_github(api, &credentials)
                .await
                .context("Failed to connect GitHub")?;
            output::success(&format!(
                "GitHub connected ({}/{})",
                credentials.org, credentials.repo
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_core::testing::{fixtures, MemoryApi};

    #[tokio::test]
    async fn test_connect_github() {
        let api = MemoryApi::new().with_workspace(fixtures::workspace());
        run(
            IntegrationCommands::Github {
                org: " acme ".into(),
                repo: "platform".into(),
                token: "ghp_x".into(),
            },
            &api,
        )
        .await
        .unwrap();
        assert_eq!(api.workspace().unwrap().github_org.as_deref(), Some("acme"));
    }

    #[tokio::test]
    async fn test_connect_jira_failure() {
        let api = MemoryApi::new().with_workspace(fixtures::workspace());
        api.fail("POST /api/workspace/integrations/jira", 400, "bad token");
        let err = run(
            IntegrationCommands::Jira {
                domain: "acme.atlassian.net".into(),
                email: "ops@acme.dev".into(),
                token: "nope".into(),
            },
            &api,
        )
        .await
        .unwrap_err();
        assert!(format!("{:#}", err).contains("400: bad token"));
    }
}
