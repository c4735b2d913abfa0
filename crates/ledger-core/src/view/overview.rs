//! Analytics overview view.

use crate::analytics::model::AnalyticsOverview;
use crate::api::LedgerApi;

/// Shown for an empty owner or category list.
pub const NO_DATA: &str = "No data yet";

#[derive(Debug, Clone, Default, PartialEq)]
pub enum OverviewView {
    #[default]
    Loading,
    Failed(String),
    Loaded(AnalyticsOverview),
}

impl OverviewView {
    pub async fn load<A: LedgerApi + ?Sized>(api: &A) -> Self {
        match api.analytics_overview().await {
            Ok(overview) => Self::Loaded(overview),
            Err(e) => Self::Failed(e.to_string()),
        }
    }

    /// Placeholder text for the non-loaded states.
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Loading => Some("Loading...".to_string()),
            Self::Failed(e) => Some(format!("Failed to load analytics: {}", e)),
            Self::Loaded(_) => None,
        }
    }

    pub fn overview(&self) -> Option<&AnalyticsOverview> {
        match self {
            Self::Loaded(o) => Some(o),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryApi;

    #[tokio::test]
    async fn test_failure_message() {
        let api = MemoryApi::new();
        api.fail("GET /api/analytics", 500, "oops");
        let view = OverviewView::load(&api).await;
        assert_eq!(
            view.message().as_deref(),
            Some("Failed to load analytics: 500: oops")
        );
        assert!(view.overview().is_none());
    }

    #[tokio::test]
    async fn test_loaded_overview() {
        let overview = AnalyticsOverview {
            total_decisions: 5,
            decisions_this_week: 1,
            queries_this_week: 0,
            confirmation_rate: 0.5,
            top_owners: Vec::new(),
            decisions_by_category: Vec::new(),
        };
        let api = MemoryApi::new().with_overview(overview.clone());
        let view = OverviewView::load(&api).await;
        assert_eq!(view.overview(), Some(&overview));
        assert_eq!(view.message(), None);
        assert_eq!(OverviewView::default().message().as_deref(), Some("Loading..."));
    }
}
