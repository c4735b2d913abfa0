//! Analytics wire models.

use serde::{Deserialize, Serialize};

/// Aggregate counts for the overview page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsOverview {
    pub total_decisions: u64,
    pub decisions_this_week: u64,
    pub queries_this_week: u64,
    /// Fraction in `[0, 1]`.
    pub confirmation_rate: f64,
    #[serde(default)]
    pub top_owners: Vec<TopOwner>,
    #[serde(default)]
    pub decisions_by_category: Vec<CategoryCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopOwner {
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub owner_slack_id: Option<String>,
    pub count: u64,
}

impl TopOwner {
    pub fn label(&self) -> &str {
        self.owner_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or(self.owner_slack_id.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or("Unknown")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    #[serde(default)]
    pub category: Option<String>,
    pub count: u64,
}

impl CategoryCount {
    pub fn label(&self) -> &str {
        self.category
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or("uncategorized")
    }
}
