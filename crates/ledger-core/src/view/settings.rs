//! Settings view: workspace profile, channels, integrations and backfill.

use std::time::Instant;

use tracing::{debug, info};

use super::notice::Notice;
use crate::api::LedgerApi;
use crate::error::{LedgerError, LedgerResult};
use crate::workspace::model::{Channel, GitHubCredentials, JiraCredentials, Workspace};
use crate::workspace::new_channel;

pub const BACKFILL_RUNNING_LABEL: &str = "Backfill Running...";
pub const BACKFILL_START_LABEL: &str = "Start Backfill";

#[derive(Debug, Clone, Default)]
pub struct SettingsView {
    workspace: Option<Workspace>,
    channels: Vec<Channel>,
    pub new_channel_id: String,
    pub new_channel_name: String,
    error: Option<String>,
    error_status: Option<u16>,
    notice: Option<Notice>,
}

impl SettingsView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the workspace and channel list concurrently.
    ///
    /// Only a workspace failure is surfaced; the channel list stays empty
    /// when it cannot be loaded.
    pub async fn load<A: LedgerApi + ?Sized>(&mut self, api: &A) {
        let (workspace, channels) = futures::join!(api.get_workspace(), api.list_channels());
        match workspace {
            Ok(ws) => {
                self.workspace = Some(ws);
                self.clear_error();
            }
            Err(e) => self.record(&e),
        }
        match channels {
            Ok(channels) => self.channels = channels,
            Err(e) => debug!(error = %e, "Channel list unavailable"),
        }
    }

    async fn reload_workspace<A: LedgerApi + ?Sized>(&mut self, api: &A) {
        match api.get_workspace().await {
            Ok(ws) => self.workspace = Some(ws),
            Err(e) => self.record(&e),
        }
    }

    fn record(&mut self, err: &LedgerError) {
        self.error = Some(err.to_string());
        self.error_status = err.status();
    }

    fn clear_error(&mut self) {
        self.error = None;
        self.error_status = None;
    }

    fn fail<T>(&mut self, err: LedgerError) -> LedgerResult<T> {
        self.record(&err);
        Err(err)
    }

    fn succeed(&mut self, message: &str) {
        self.clear_error();
        self.notice = Some(Notice::new(message, Instant::now()));
    }

    // ----- channels -----

    /// Add the channel typed into the form inputs.
    ///
    /// Returns `Ok(None)` without a request when the id is blank.
    pub async fn add_channel<A: LedgerApi + ?Sized>(
        &mut self,
        api: &A,
    ) -> LedgerResult<Option<Channel>> {
        let Some(body) = new_channel(&self.new_channel_id, &self.new_channel_name) else {
            return Ok(None);
        };
        match api.add_channel(&body).await {
            Ok(channel) => {
                info!(channel_id = %channel.channel_id, "Channel added");
                self.channels.push(channel.clone());
                self.new_channel_id.clear();
                self.new_channel_name.clear();
                self.succeed("Channel added");
                Ok(Some(channel))
            }
            Err(e) => self.fail(e),
        }
    }

    /// Stop monitoring a channel by its external id.
    pub async fn remove_channel<A: LedgerApi + ?Sized>(
        &mut self,
        api: &A,
        channel_id: &str,
    ) -> LedgerResult<()> {
        match api.remove_channel(channel_id).await {
            Ok(()) => {
                info!(channel_id, "Channel removed");
                self.channels.retain(|c| c.channel_id != channel_id);
                self.clear_error();
                Ok(())
            }
            Err(e) => self.fail(e),
        }
    }

    // ----- integrations -----

    pub async fn connect_jira<A: LedgerApi + ?Sized>(
        &mut self,
        api: &A,
        credentials: &JiraCredentials,
    ) -> LedgerResult<()> {
        if let Err(e) = api.connect_jira(credentials).await {
            return self.fail(e);
        }
        info!(domain = %credentials.domain, "Jira connected");
        self.succeed("Jira connected");
        self.reload_workspace(api).await;
        Ok(())
    }

    pub async fn connect_github<A: LedgerApi + ?Sized>(
        &mut self,
        api: &A,
        credentials: &GitHubCredentials,
    ) -> LedgerResult<()> {
        if let Err(e) = api.connect_github(credentials).await {
            return self.fail(e);
        }
        info!(org = %credentials.org, repo = %credentials.repo, "GitHub connected");
        self.succeed("GitHub connected");
        self.reload_workspace(api).await;
        Ok(())
    }

    // ----- backfill -----

    /// Start a historical scan. Refused while one is queued or running.
    pub async fn trigger_backfill<A: LedgerApi + ?Sized>(&mut self, api: &A) -> LedgerResult<()> {
        if self.backfill_active() {
            return self.fail(LedgerError::validation("a backfill is already running"));
        }
        if let Err(e) = api.trigger_backfill().await {
            return self.fail(e);
        }
        info!("Backfill started");
        self.succeed("Backfill started");
        self.reload_workspace(api).await;
        Ok(())
    }

    pub fn backfill_active(&self) -> bool {
        self.workspace
            .as_ref()
            .is_some_and(|ws| ws.backfill().is_active())
    }

    pub fn backfill_button_label(&self) -> &'static str {
        if self.backfill_active() {
            BACKFILL_RUNNING_LABEL
        } else {
            BACKFILL_START_LABEL
        }
    }

    pub fn backfill_status_label(&self) -> String {
        match &self.workspace {
            Some(ws) => ws.backfill().label().to_string(),
            None => "Not started".to_string(),
        }
    }

    // ----- rendering -----

    pub fn workspace(&self) -> Option<&Workspace> {
        self.workspace.as_ref()
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn jira_connected(&self) -> bool {
        self.workspace.as_ref().is_some_and(Workspace::jira_connected)
    }

    pub fn github_connected(&self) -> bool {
        self.workspace.as_ref().is_some_and(Workspace::github_connected)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// HTTP status of the API failure behind [`error`](Self::error), if any.
    pub fn error_status(&self) -> Option<u16> {
        self.error_status
    }

    /// The success notice, if it has not expired at `now`.
    pub fn notice(&self, now: Instant) -> Option<&str> {
        self.notice
            .as_ref()
            .filter(|n| n.is_visible(now))
            .map(Notice::message)
    }
}

/// "Connected" or "Not connected".
pub fn connection_label(connected: bool) -> &'static str {
    if connected {
        "Connected"
    } else {
        "Not connected"
    }
}
