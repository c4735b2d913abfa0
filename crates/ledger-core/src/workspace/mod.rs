//! Workspace profile, monitored channels, integrations and backfill.

pub mod model;

use model::NewChannel;

pub const WORKSPACE_PATH: &str = "/api/workspace";
pub const SETTINGS_PATH: &str = "/api/workspace/settings";
pub const CHANNELS_PATH: &str = "/api/workspace/channels";
pub const JIRA_PATH: &str = "/api/workspace/integrations/jira";
pub const GITHUB_PATH: &str = "/api/workspace/integrations/github";
pub const BACKFILL_PATH: &str = "/api/workspace/backfill";

/// Path of a monitored channel, keyed by its external id.
pub fn channel_path(channel_id: &str) -> String {
    format!("{}/{}", CHANNELS_PATH, urlencoding::encode(channel_id))
}

/// Build the add-channel body from form input.
///
/// Returns `None` when the id is blank. A blank name is sent as `null`.
pub fn new_channel(channel_id: &str, channel_name: &str) -> Option<NewChannel> {
    let id = channel_id.trim();
    if id.is_empty() {
        return None;
    }
    let name = channel_name.trim();
    Some(NewChannel {
        channel_id: id.to_string(),
        channel_name: (!name.is_empty()).then(|| name.to_string()),
    })
}
