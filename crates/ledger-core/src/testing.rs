//! In-memory [`LedgerApi`] for tests.
//!
//! Keeps decisions, the workspace and channels in memory, records every
//! request as a `"METHOD path"` line and can be told to fail requests by
//! line prefix with a given status and body.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::{Mutex, MutexGuard};

use crate::analytics::{self, model::AnalyticsOverview};
use crate::api::{Health, LedgerApi, HEALTH_PATH};
use crate::decision::model::{
    Decision, DecisionDetail, DecisionStatus, DecisionUpdate, PaginatedDecisions,
};
use crate::decision::{decision_path, DecisionAction, DecisionQuery};
use crate::error::{LedgerError, LedgerResult};
use crate::search::{self, model::{SearchRequest, SearchResult}};
use crate::workspace::{
    self,
    model::{
        BackfillStarted, Channel, GitHubCredentials, IntegrationStatus, JiraCredentials,
        NewChannel, Workspace, WorkspaceSettingsUpdate,
    },
};

const FIXED_TIMESTAMP: &str = "2024-06-01T12:00:00Z";

#[derive(Default)]
struct MemoryState {
    decisions: Vec<DecisionDetail>,
    workspace: Option<Workspace>,
    channels: Vec<Channel>,
    overview: Option<AnalyticsOverview>,
    search_result: Option<SearchResult>,
    failures: Vec<(String, u16, String)>,
    requests: Vec<String>,
    next_id: u64,
}

/// Test double of the ledger API.
#[derive(Default)]
pub struct MemoryApi {
    state: Mutex<MemoryState>,
}

impl MemoryApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_decisions(self, decisions: Vec<Decision>) -> Self {
        self.lock().decisions = decisions
            .into_iter()
            .map(|decision| DecisionDetail { decision, links: Vec::new() })
            .collect();
        self
    }

    pub fn with_details(self, details: Vec<DecisionDetail>) -> Self {
        self.lock().decisions = details;
        self
    }

    pub fn with_workspace(self, workspace: Workspace) -> Self {
        self.lock().workspace = Some(workspace);
        self
    }

    pub fn with_channels(self, channels: Vec<Channel>) -> Self {
        self.lock().channels = channels;
        self
    }

    pub fn with_overview(self, overview: AnalyticsOverview) -> Self {
        self.lock().overview = Some(overview);
        self
    }

    pub fn with_search_result(self, result: SearchResult) -> Self {
        self.lock().search_result = Some(result);
        self
    }

    /// Fail every request whose `"METHOD path"` line starts with `prefix`.
    pub fn fail(&self, prefix: &str, status: u16, body: &str) {
        self.lock()
            .failures
            .push((prefix.to_string(), status, body.to_string()));
    }

    /// Stop failing requests.
    pub fn heal(&self) {
        self.lock().failures.clear();
    }

    /// Every request seen so far, oldest first.
    pub fn requests(&self) -> Vec<String> {
        self.lock().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.lock().requests.len()
    }

    pub fn clear_requests(&self) {
        self.lock().requests.clear();
    }

    /// Current server-side copy of a decision.
    pub fn decision(&self, id: &str) -> Option<Decision> {
        self.lock()
            .decisions
            .iter()
            .find(|d| d.decision.id == id)
            .map(|d| d.decision.clone())
    }

    pub fn workspace(&self) -> Option<Workspace> {
        self.lock().workspace.clone()
    }

    pub fn channels(&self) -> Vec<Channel> {
        self.lock().channels.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Record the request and return the state, or the injected failure.
    fn begin(&self, method: &str, path: &str) -> LedgerResult<MutexGuard<'_, MemoryState>> {
        let line = format!("{} {}", method, path);
        let mut state = self.lock();
        state.requests.push(line.clone());
        if let Some((_, status, body)) = state
            .failures
            .iter()
            .find(|(prefix, _, _)| line.starts_with(prefix.as_str()))
        {
            return Err(LedgerError::Api { status: *status, body: body.clone() });
        }
        Ok(state)
    }
}

fn not_found(what: &str) -> LedgerError {
    LedgerError::Api {
        status: 404,
        body: format!(r#"{{"detail":"{} not found"}}"#, what),
    }
}

fn conflict(detail: &str) -> LedgerError {
    LedgerError::Api {
        status: 409,
        body: format!(r#"{{"detail":"{}"}}"#, detail),
    }
}

fn matches(decision: &Decision, query: &DecisionQuery) -> bool {
    let f = &query.filters;
    if decision.status == DecisionStatus::Deleted {
        return false;
    }
    if f.status.is_some_and(|s| s != decision.status) {
        return false;
    }
    if let Some(category) = f.category.as_deref().filter(|c| !c.trim().is_empty()) {
        if decision.category.as_deref() != Some(category) {
            return false;
        }
    }
    if let Some(tag) = f.tag.as_deref().filter(|t| !t.trim().is_empty()) {
        if !decision.tags().iter().any(|t| t == tag) {
            return false;
        }
    }
    if let Some(owner) = f.owner_slack_id.as_deref().filter(|o| !o.trim().is_empty()) {
        if decision.owner_slack_id.as_deref() != Some(owner) {
            return false;
        }
    }
    true
}

#[async_trait]
impl LedgerApi for MemoryApi {
    async fn list_decisions(&self, query: &DecisionQuery) -> LedgerResult<PaginatedDecisions> {
        let state = self.begin("GET", &query.to_path())?;
        let matching: Vec<Decision> = state
            .decisions
            .iter()
            .map(|d| &d.decision)
            .filter(|d| matches(d, query))
            .cloned()
            .collect();
        let per_page = query.per_page.max(1) as usize;
        let skip = (query.page.max(1) as usize - 1) * per_page;
        Ok(PaginatedDecisions {
            total: matching.len() as u64,
            items: matching.into_iter().skip(skip).take(per_page).collect(),
            page: query.page,
            per_page: query.per_page,
        })
    }

    async fn get_decision(&self, id: &str) -> LedgerResult<DecisionDetail> {
        let state = self.begin("GET", &decision_path(id))?;
        state
            .decisions
            .iter()
            .find(|d| d.decision.id == id)
            .cloned()
            .ok_or_else(|| not_found("Decision"))
    }

    async fn update_decision(&self, id: &str, update: &DecisionUpdate) -> LedgerResult<Decision> {
        let mut state = self.begin("PATCH", &decision_path(id))?;
        let detail = state
            .decisions
            .iter_mut()
            .find(|d| d.decision.id == id)
            .ok_or_else(|| not_found("Decision"))?;
        let d = &mut detail.decision;
        if let Some(title) = &update.title {
            d.title = title.clone();
        }
        if let Some(summary) = &update.summary {
            d.summary = Some(summary.clone());
        }
        if let Some(rationale) = &update.rationale {
            d.rationale = Some(rationale.clone());
        }
        if let Some(tags) = &update.tags {
            d.tags = Some(tags.clone());
        }
        if let Some(impact) = &update.impact_area {
            d.impact_area = Some(impact.clone());
        }
        if let Some(category) = &update.category {
            d.category = Some(category.clone());
        }
        if let Some(status) = update.status {
            d.status = status;
        }
        Ok(d.clone())
    }

    async fn delete_decision(&self, id: &str) -> LedgerResult<()> {
        let mut state = self.begin("DELETE", &decision_path(id))?;
        let detail = state
            .decisions
            .iter_mut()
            .find(|d| d.decision.id == id)
            .ok_or_else(|| not_found("Decision"))?;
        detail.decision.status = DecisionStatus::Deleted;
        Ok(())
    }

    async fn decision_action(&self, id: &str, action: DecisionAction) -> LedgerResult<Decision> {
        let mut state = self.begin("POST", &action.path(id))?;
        let detail = state
            .decisions
            .iter_mut()
            .find(|d| d.decision.id == id)
            .ok_or_else(|| not_found("Decision"))?;
        let d = &mut detail.decision;
        match action {
            DecisionAction::Confirm => {
                d.status = DecisionStatus::Active;
                d.confirmed_at = Some(FIXED_TIMESTAMP.to_string());
                d.confirmed_by = Some("U_TEST".to_string());
            }
            DecisionAction::Ignore => d.status = DecisionStatus::Ignored,
        }
        Ok(d.clone())
    }

    async fn search(&self, request: &SearchRequest) -> LedgerResult<SearchResult> {
        let state = self.begin("POST", search::SEARCH_PATH)?;
        let mut result = state.search_result.clone().unwrap_or_else(|| SearchResult {
            answer: "No relevant decisions found.".to_string(),
            decisions: Vec::new(),
            total_count: 0,
            response_time_ms: 1,
        });
        result.decisions.truncate(request.limit as usize);
        Ok(result)
    }

    async fn get_workspace(&self) -> LedgerResult<Workspace> {
        let state = self.begin("GET", workspace::WORKSPACE_PATH)?;
        state.workspace.clone().ok_or_else(|| not_found("Workspace"))
    }

    async fn update_workspace_settings(
        &self,
        _update: &WorkspaceSettingsUpdate,
    ) -> LedgerResult<Workspace> {
        let mut state = self.begin("PATCH", workspace::SETTINGS_PATH)?;
        let ws = state.workspace.as_mut().ok_or_else(|| not_found("Workspace"))?;
        ws.updated_at = FIXED_TIMESTAMP.to_string();
        Ok(ws.clone())
    }

    async fn list_channels(&self) -> LedgerResult<Vec<Channel>> {
        let state = self.begin("GET", workspace::CHANNELS_PATH)?;
        Ok(state.channels.clone())
    }

    async fn add_channel(&self, channel: &NewChannel) -> LedgerResult<Channel> {
        let mut state = self.begin("POST", workspace::CHANNELS_PATH)?;
        if state.channels.iter().any(|c| c.channel_id == channel.channel_id) {
            return Err(conflict("Channel already monitored"));
        }
        state.next_id += 1;
        let created = Channel {
            id: format!("ch-{}", state.next_id),
            channel_id: channel.channel_id.clone(),
            channel_name: channel.channel_name.clone(),
            enabled: true,
            created_at: FIXED_TIMESTAMP.to_string(),
        };
        state.channels.push(created.clone());
        Ok(created)
    }

    async fn remove_channel(&self, channel_id: &str) -> LedgerResult<()> {
        let mut state = self.begin("DELETE", &workspace::channel_path(channel_id))?;
        let before = state.channels.len();
        state.channels.retain(|c| c.channel_id != channel_id);
        if state.channels.len() == before {
            return Err(not_found("Channel"));
        }
        Ok(())
    }

    async fn connect_jira(&self, credentials: &JiraCredentials) -> LedgerResult<IntegrationStatus> {
        let mut state = self.begin("POST", workspace::JIRA_PATH)?;
        let ws = state.workspace.as_mut().ok_or_else(|| not_found("Workspace"))?;
        ws.jira_domain = Some(credentials.domain.clone());
        let mut details = Map::new();
        details.insert("domain".into(), Value::String(credentials.domain.clone()));
        Ok(IntegrationStatus { status: "connected".into(), details })
    }

    async fn connect_github(
        &self,
        credentials: &GitHubCredentials,
    ) -> LedgerResult<IntegrationStatus> {
        let mut state = self.begin("POST", workspace::GITHUB_PATH)?;
        let ws = state.workspace.as_mut().ok_or_else(|| not_found("Workspace"))?;
        ws.github_org = Some(credentials.org.clone());
        ws.github_repo = Some(credentials.repo.clone());
        let mut details = Map::new();
        details.insert("org".into(), Value::String(credentials.org.clone()));
        details.insert("repo".into(), Value::String(credentials.repo.clone()));
        Ok(IntegrationStatus { status: "connected".into(), details })
    }

    async fn trigger_backfill(&self) -> LedgerResult<BackfillStarted> {
        let mut state = self.begin("POST", workspace::BACKFILL_PATH)?;
        let ws = state.workspace.as_mut().ok_or_else(|| not_found("Workspace"))?;
        if ws.backfill_status.as_deref() == Some("in_progress") {
            return Err(conflict("Backfill already running"));
        }
        ws.backfill_status = Some("running".to_string());
        Ok(BackfillStarted {
            status: "started".to_string(),
            workspace_id: Some(ws.id.clone()),
        })
    }

    async fn analytics_overview(&self) -> LedgerResult<AnalyticsOverview> {
        let state = self.begin("GET", analytics::OVERVIEW_PATH)?;
        state.overview.clone().ok_or_else(|| not_found("Analytics"))
    }

    async fn health(&self) -> LedgerResult<Health> {
        let _state = self.begin("GET", HEALTH_PATH)?;
        Ok(Health { status: "ok".to_string() })
    }
}

/// Fixture builders shared by tests across crates.
pub mod fixtures {
    use super::*;

    pub fn decision(id: &str, title: &str, status: DecisionStatus) -> Decision {
        Decision {
            id: id.to_string(),
            title: title.to_string(),
            summary: Some(format!("Summary of {}", title)),
            rationale: None,
            owner_name: Some("Ada".to_string()),
            owner_slack_id: Some("U001".to_string()),
            tags: Some(vec!["backend".to_string()]),
            category: Some("architecture".to_string()),
            impact_area: None,
            status,
            confidence: Some(0.9),
            source_url: None,
            source_channel_name: Some("eng".to_string()),
            created_at: FIXED_TIMESTAMP.to_string(),
            confirmed_at: None,
            confirmed_by: None,
        }
    }

    /// `count` pending decisions with ids `d1..=dN`.
    pub fn pending_decisions(count: usize) -> Vec<Decision> {
        (1..=count)
            .map(|i| decision(&format!("d{}", i), &format!("Decision {}", i), DecisionStatus::Pending))
            .collect()
    }

    pub fn workspace() -> Workspace {
        Workspace {
            id: "ws-1".to_string(),
            slack_team_id: "T0001".to_string(),
            team_name: "Acme Eng".to_string(),
            plan: Some("team".to_string()),
            onboarding_complete: true,
            backfill_status: None,
            jira_domain: None,
            github_org: None,
            github_repo: None,
            created_at: FIXED_TIMESTAMP.to_string(),
            updated_at: FIXED_TIMESTAMP.to_string(),
        }
    }

    pub fn channel(channel_id: &str, name: Option<&str>) -> Channel {
        Channel {
            id: format!("row-{}", channel_id),
            channel_id: channel_id.to_string(),
            channel_name: name.map(str::to_string),
            enabled: true,
            created_at: FIXED_TIMESTAMP.to_string(),
        }
    }
}
