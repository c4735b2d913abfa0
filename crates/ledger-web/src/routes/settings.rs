//! Workspace settings page and its forms.
//!
//! Every form posts back here and the page is rendered in place, with the
//! success notice or the error of the operation.

use askama::Template;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    Form,
};
use ledger_core::view::notice::NOTICE_TTL;
use ledger_core::view::settings::{connection_label, SettingsView};
use ledger_core::workspace::model::{GitHubCredentials, JiraCredentials};
use ledger_core::LedgerResult;
use serde::Deserialize;
use std::time::Instant;

use super::{error_status, render, upstream_status};
use crate::nav::{nav_links, NavLink};
use crate::state::AppState;

// ============================================================
// TEMPLATES
// ============================================================

#[derive(Template)]
#[template(path = "settings.html")]
struct SettingsTemplate {
    nav: Vec<NavLink>,
    error: Option<String>,
    notice: Option<String>,
    notice_ms: u128,
    workspace: Option<WorkspaceView>,
    channels: Vec<ChannelRow>,
    new_channel_id: String,
    new_channel_name: String,
    jira_label: &'static str,
    github_label: &'static str,
    backfill_status: String,
    backfill_label: &'static str,
    backfill_active: bool,
}

struct WorkspaceView {
    team_name: String,
    slack_team_id: String,
    plan: String,
}

struct ChannelRow {
    channel_id: String,
    display_name: String,
    remove_href: String,
}

impl SettingsTemplate {
    fn from_view(view: &SettingsView) -> Self {
        Self {
            nav: nav_links("/dashboard/settings"),
            error: view.error().map(str::to_string),
            notice: view.notice(Instant::now()).map(str::to_string),
            notice_ms: NOTICE_TTL.as_millis(),
            workspace: view.workspace().map(|ws| WorkspaceView {
                team_name: ws.team_name.clone(),
                slack_team_id: ws.slack_team_id.clone(),
                plan: ws.plan.clone().unwrap_or_else(|| "free".to_string()),
            }),
            channels: view
                .channels()
                .iter()
                .map(|c| ChannelRow {
                    channel_id: c.channel_id.clone(),
                    display_name: c.display_name(),
                    remove_href: format!(
                        "/dashboard/settings/channels/{}/remove",
                        urlencoding::encode(&c.channel_id)
                    ),
                })
                .collect(),
            new_channel_id: view.new_channel_id.clone(),
            new_channel_name: view.new_channel_name.clone(),
            jira_label: connection_label(view.jira_connected()),
            github_label: connection_label(view.github_connected()),
            backfill_status: view.backfill_status_label(),
            backfill_label: view.backfill_button_label(),
            backfill_active: view.backfill_active(),
        }
    }
}

/// Render the page after an operation, with its outcome as the status.
fn respond<T>(view: &SettingsView, outcome: LedgerResult<T>) -> Response {
    let status = match &outcome {
        Ok(_) => StatusCode::OK,
        Err(e) => error_status(e),
    };
    render(status, &SettingsTemplate::from_view(view))
}

async fn loaded(state: &AppState) -> SettingsView {
    let mut view = SettingsView::new();
    view.load(state.api.as_ref()).await;
    view
}

// ============================================================
// REQUEST TYPES
// ============================================================

#[derive(Debug, Deserialize)]
pub struct ChannelForm {
    pub channel_id: String,
    #[serde(default)]
    pub channel_name: String,
}

#[derive(Deserialize)]
pub struct JiraForm {
    pub domain: String,
    pub email: String,
    pub api_token: String,
}

#[derive(Deserialize)]
pub struct GitHubForm {
    pub org: String,
    pub repo: String,
    pub token: String,
}

// ============================================================
// HANDLERS
// ============================================================

/// GET /dashboard/settings
pub async fn show(State(state): State<AppState>) -> Response {
    let view = loaded(&state).await;
    let status = match view.error() {
        Some(_) if view.workspace().is_none() => upstream_status(view.error_status()),
        _ => StatusCode::OK,
    };
    render(status, &SettingsTemplate::from_view(&view))
}

/// POST /dashboard/settings/channels
pub async fn add_channel(State(state): State<AppState>, Form(form): Form<ChannelForm>) -> Response {
    let mut view = loaded(&state).await;
    view.new_channel_id = form.channel_id;
    view.new_channel_name = form.channel_name;
    let outcome = view.add_channel(state.api.as_ref()).await;
    respond(&view, outcome)
}

/// POST /dashboard/settings/channels/{channel_id}/remove
pub async fn remove_channel(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
) -> Response {
    let mut view = loaded(&state).await;
    let outcome = view.remove_channel(state.api.as_ref(), &channel_id).await;
    respond(&view, outcome)
}

/// POST /dashboard/settings/jira
pub async fn connect_jira(State(state): State<AppState>, Form(form): Form<JiraForm>) -> Response {
    let credentials = JiraCredentials {
        domain: form.domain.trim().to_string(),
        email: form.email.trim().to_string(),
        api_token: form.api_token,
    };
    let mut view = loaded(&state).await;
    let outcome = view.connect_jira(state.api.as_ref(), &credentials).await;
    respond(&view, outcome)
}

/// POST /dashboard/settings/github
pub async fn connect_github(
    State(state): State<AppState>,
    Form(form): Form<GitHubForm>,
) -> Response {
    let credentials = GitHubCredentials {
        org: form.org.trim().to_string(),
        repo: form.repo.trim().to_string(),
        token: form.token,
    };
    let mut view = loaded(&state).await;
    let outcome = view.connect_github(state.api.as_ref(), &credentials).await;
    respond(&view, outcome)
}

/// POST /dashboard/settings/backfill
pub async fn trigger_backfill(State(state): State<AppState>) -> Response {
    let mut view = loaded(&state).await;
    let outcome = view.trigger_backfill(state.api.as_ref()).await;
    respond(&view, outcome)
}
