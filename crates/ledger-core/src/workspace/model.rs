//! Workspace and channel wire models.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The tenant's workspace. One per Slack team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: String,
    pub slack_team_id: String,
    pub team_name: String,
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(default)]
    pub onboarding_complete: bool,
    #[serde(default)]
    pub backfill_status: Option<String>,
    #[serde(default)]
    pub jira_domain: Option<String>,
    #[serde(default)]
    pub github_org: Option<String>,
    #[serde(default)]
    pub github_repo: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Workspace {
    pub fn backfill(&self) -> BackfillStatus {
        BackfillStatus::from_raw(self.backfill_status.as_deref())
    }

    pub fn jira_connected(&self) -> bool {
        self.jira_domain.as_deref().is_some_and(|d| !d.is_empty())
    }

    pub fn github_connected(&self) -> bool {
        self.github_org.as_deref().is_some_and(|o| !o.is_empty())
    }
}

/// Progress of the historical channel scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackfillStatus {
    NotStarted,
    /// Accepted by the API, not yet picked up by a worker.
    Running,
    InProgress,
    Complete,
    Other(String),
}

impl BackfillStatus {
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => Self::NotStarted,
            Some("running") => Self::Running,
            Some("in_progress") => Self::InProgress,
            Some("complete") => Self::Complete,
            Some(other) => Self::Other(other.to_string()),
        }
    }

    /// A scan is queued or underway; another must not be started.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Running | Self::InProgress)
    }

    /// Raw status for display, "Not started" when absent.
    pub fn label(&self) -> &str {
        match self {
            Self::NotStarted => "Not started",
            Self::Running => "running",
            Self::InProgress => "in_progress",
            Self::Complete => "complete",
            Self::Other(s) => s,
        }
    }
}

/// A monitored Slack channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    /// External (Slack) channel id.
    pub channel_id: String,
    #[serde(default)]
    pub channel_name: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub created_at: String,
}

impl Channel {
    /// `#name`, falling back to `#id`.
    pub fn display_name(&self) -> String {
        let name = self
            .channel_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.channel_id);
        format!("#{}", name)
    }
}

fn default_enabled() -> bool {
    true
}

/// Body of `POST /api/workspace/channels`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewChannel {
    pub channel_id: String,
    pub channel_name: Option<String>,
}

/// Body of `POST /api/workspace/integrations/jira`.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct JiraCredentials {
    pub domain: String,
    pub email: String,
    pub api_token: String,
}

/// Body of `POST /api/workspace/integrations/github`.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct GitHubCredentials {
    pub org: String,
    pub repo: String,
    pub token: String,
}

// Tokens never reach logs.
impl std::fmt::Debug for JiraCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JiraCredentials")
            .field("domain", &self.domain)
            .field("email", &self.email)
            .field("api_token", &"<redacted>")
            .finish()
    }
}

impl std::fmt::Debug for GitHubCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubCredentials")
            .field("org", &self.org)
            .field("repo", &self.repo)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Acknowledgement of an integration connect call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationStatus {
    pub status: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// Acknowledgement of a backfill trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackfillStarted {
    pub status: String,
    #[serde(default)]
    pub workspace_id: Option<String>,
}

/// Body of `PATCH /api/workspace/settings`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceSettingsUpdate {
    pub settings: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backfill_status_mapping() {
        assert_eq!(BackfillStatus::from_raw(None), BackfillStatus::NotStarted);
        assert_eq!(BackfillStatus::from_raw(None).label(), "Not started");
        assert!(BackfillStatus::from_raw(Some("in_progress")).is_active());
        assert!(BackfillStatus::from_raw(Some("running")).is_active());
        assert!(!BackfillStatus::from_raw(Some("complete")).is_active());
        assert_eq!(
            BackfillStatus::from_raw(Some("failed")),
            BackfillStatus::Other("failed".into())
        );
    }

    #[test]
    fn test_channel_display_name() {
        let mut ch = Channel {
            id: "1".into(),
            channel_id: "C042".into(),
            channel_name: None,
            enabled: true,
            created_at: "2024-01-01T00:00:00Z".into(),
        };
        assert_eq!(ch.display_name(), "#C042");
        ch.channel_name = Some("eng-decisions".into());
        assert_eq!(ch.display_name(), "#eng-decisions");
    }

    #[test]
    fn test_credentials_debug_redacts_tokens() {
        let jira = JiraCredentials {
            domain: "acme.atlassian.net".into(),
            email: "a@acme.dev".into(),
            api_token: "secret-token".into(),
        };
        let out = format!("{:?}", jira);
        assert!(out.contains("acme.atlassian.net"));
        assert!(!out.contains("secret-token"));
    }

    #[test]
    fn test_integration_status_keeps_details() {
        let status: IntegrationStatus =
            serde_json::from_str(r#"{"status":"connected","org":"acme","repo":"api"}"#).unwrap();
        assert_eq!(status.status, "connected");
        assert_eq!(status.details["org"], "acme");
    }
}
