//! Typed endpoints of the ledger API.
//!
//! Views depend on [`LedgerApi`] rather than on the HTTP client so they can
//! be driven by an in-memory implementation in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::analytics::{self, model::AnalyticsOverview};
use crate::client::HttpClient;
use crate::decision::model::{Decision, DecisionDetail, DecisionUpdate, PaginatedDecisions};
use crate::decision::{decision_path, DecisionAction, DecisionQuery};
use crate::error::LedgerResult;
use crate::search::{self, model::{SearchRequest, SearchResult}};
use crate::workspace::{
    self,
    model::{
        BackfillStarted, Channel, GitHubCredentials, IntegrationStatus, JiraCredentials,
        NewChannel, Workspace, WorkspaceSettingsUpdate,
    },
};

/// Path of the liveness probe.
pub const HEALTH_PATH: &str = "/health";

/// Liveness probe answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
}

/// Every operation the dashboard performs against the API.
#[async_trait]
pub trait LedgerApi: Send + Sync {
    async fn list_decisions(&self, query: &DecisionQuery) -> LedgerResult<PaginatedDecisions>;

    async fn get_decision(&self, id: &str) -> LedgerResult<DecisionDetail>;

    async fn update_decision(&self, id: &str, update: &DecisionUpdate) -> LedgerResult<Decision>;

    async fn delete_decision(&self, id: &str) -> LedgerResult<()>;

    /// Request a status transition. The server owns the resulting status.
    async fn decision_action(&self, id: &str, action: DecisionAction) -> LedgerResult<Decision>;

    async fn search(&self, request: &SearchRequest) -> LedgerResult<SearchResult>;

    async fn get_workspace(&self) -> LedgerResult<Workspace>;

    async fn update_workspace_settings(
        &self,
        update: &WorkspaceSettingsUpdate,
    ) -> LedgerResult<Workspace>;

    async fn list_channels(&self) -> LedgerResult<Vec<Channel>>;

    async fn add_channel(&self, channel: &NewChannel) -> LedgerResult<Channel>;

    /// Stop monitoring a channel, keyed by its external id.
    async fn remove_channel(&self, channel_id: &str) -> LedgerResult<()>;

    async fn connect_jira(&self, credentials: &JiraCredentials) -> LedgerResult<IntegrationStatus>;

    async fn connect_github(
        &self,
        credentials: &GitHubCredentials,
    ) -> LedgerResult<IntegrationStatus>;

    async fn trigger_backfill(&self) -> LedgerResult<BackfillStarted>;

    async fn analytics_overview(&self) -> LedgerResult<AnalyticsOverview>;

    async fn health(&self) -> LedgerResult<Health>;
}

#[async_trait]
impl LedgerApi for HttpClient {
    async fn list_decisions(&self, query: &DecisionQuery) -> LedgerResult<PaginatedDecisions> {
        self.get(&query.to_path()).await
    }

    async fn get_decision(&self, id: &str) -> LedgerResult<DecisionDetail> {
        self.get(&decision_path(id)).await
    }

    async fn update_decision(&self, id: &str, update: &DecisionUpdate) -> LedgerResult<Decision> {
        self.patch(&decision_path(id), update).await
    }

    async fn delete_decision(&self, id: &str) -> LedgerResult<()> {
        self.delete(&decision_path(id)).await
    }

    async fn decision_action(&self, id: &str, action: DecisionAction) -> LedgerResult<Decision> {
        self.post::<_, ()>(&action.path(id), None).await
    }

    async fn search(&self, request: &SearchRequest) -> LedgerResult<SearchResult> {
        self.post(search::SEARCH_PATH, Some(request)).await
    }

    async fn get_workspace(&self) -> LedgerResult<Workspace> {
        self.get(workspace::WORKSPACE_PATH).await
    }

    async fn update_workspace_settings(
        &self,
        update: &WorkspaceSettingsUpdate,
    ) -> LedgerResult<Workspace> {
        self.patch(workspace::SETTINGS_PATH, update).await
    }

    async fn list_channels(&self) -> LedgerResult<Vec<Channel>> {
        self.get(workspace::CHANNELS_PATH).await
    }

    async fn add_channel(&self, channel: &NewChannel) -> LedgerResult<Channel> {
        self.post(workspace::CHANNELS_PATH, Some(channel)).await
    }

    async fn remove_channel(&self, channel_id: &str) -> LedgerResult<()> {
        self.delete(&workspace::channel_path(channel_id)).await
    }

    async fn connect_jira(&self, credentials: &JiraCredentials) -> LedgerResult<IntegrationStatus> {
        self.post(workspace::JIRA_PATH, Some(credentials)).await
    }

    async fn connect_github(
        &self,
        credentials: &GitHubCredentials,
    ) -> LedgerResult<IntegrationStatus> {
        self.post(workspace::GITHUB_PATH, Some(credentials)).await
    }

    async fn trigger_backfill(&self) -> LedgerResult<BackfillStarted> {
        self.post::<_, ()>(workspace::BACKFILL_PATH, None).await
    }

    async fn analytics_overview(&self) -> LedgerResult<AnalyticsOverview> {
        self.get(analytics::OVERVIEW_PATH).await
    }

    async fn health(&self) -> LedgerResult<Health> {
        self.get(HEALTH_PATH).await
    }
}
