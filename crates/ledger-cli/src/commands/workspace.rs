//! Workspace commands.

use anyhow::{bail, Context as _, Result};
use clap::Subcommand;
use ledger_core::workspace::model::WorkspaceSettingsUpdate;
use ledger_core::LedgerApi;
use serde_json::{Map, Value};

use super::Context;
use crate::output;

#[derive(Subcommand)]
pub enum WorkspaceCommands {
    /// Show the workspace profile and integration status
    Show,

    /// Update workspace settings
    Settings {
        /// Settings as key=value pairs; values are parsed as JSON when possible
        #[arg(required = true, value_name = "KEY=VALUE")]
        set: Vec<String>,
    },
}

pub async fn execute(cmd: WorkspaceCommands, ctx: &Context) -> Result<()> {
    let api = ctx.client()?;
    run(cmd, &api).await
}

async fn run<A: LedgerApi + ?Sized>(cmd: WorkspaceCommands, api: &A) -> Result<()> {
    match cmd {
        WorkspaceCommands::Show => {
            let ws = api.get_workspace().await.context("Failed to load workspace")?;
            output::print_workspace(&ws);
        }

        WorkspaceCommands::Settings { set } => {
            let update = parse_settings(&set)?;
            let ws = api
                .update_workspace_settings(&update)
                .await
                .context("Failed to update workspace settings")?;
            output::success(&format!("Updated {} setting(s)", update.settings.len()));
            output::print_workspace(&ws);
        }
    }
    Ok(())
}

/// Parse `key=value` pairs. `true`, `42` or `{"a":1}` become JSON values,
/// anything else a string.
fn parse_settings(pairs: &[String]) -> Result<WorkspaceSettingsUpdate> {
    let mut settings = Map::new();
    for pair in pairs {
        let Some((key, raw)) = pair.split_once('=') else {
            bail!("Invalid setting '{}': expected KEY=VALUE", pair);
        };
        let key = key.trim();
        if key.is_empty() {
            bail!("Invalid setting '{}': empty key", pair);
        }
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        settings.insert(key.to_string(), value);
    }
    Ok(WorkspaceSettingsUpdate { settings })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_core::testing::{fixtures, MemoryApi};
    use serde_json::json;

    #[test]
    fn test_parse_settings_values() {
        let update = parse_settings(&[
            "digest_enabled=true".to_string(),
            "digest_hour=9".to_string(),
            "timezone=Europe/Berlin".to_string(),
        ])
        .unwrap();
        assert_eq!(
            Value::Object(update.settings),
            json!({"digest_enabled": true, "digest_hour": 9, "timezone": "Europe/Berlin"})
        );
    }

    #[test]
    fn test_parse_settings_rejects_missing_equals() {
        assert!(parse_settings(&["oops".to_string()]).is_err());
        assert!(parse_settings(&["=1".to_string()]).is_err());
    }

    #[tokio::test]
    async fn test_settings_patch() {
        let api = MemoryApi::new().with_workspace(fixtures::workspace());
        run(
            WorkspaceCommands::Settings { set: vec!["digest_enabled=false".into()] },
            &api,
        )
        .await
        .unwrap();
        assert_eq!(api.requests(), ["PATCH /api/workspace/settings"]);
    }
}
