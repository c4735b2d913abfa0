//! Decisions: list filters, request paths and status actions.

pub mod model;

use serde::{Deserialize, Serialize};

use model::{Decision, DecisionStatus};

/// Category vocabulary offered as list filters.
pub const CATEGORIES: [&str; 11] = [
    "architecture",
    "schema",
    "api",
    "infrastructure",
    "deprecation",
    "dependency",
    "naming",
    "process",
    "security",
    "performance",
    "tooling",
];

/// Filters of the decision list. Blank strings count as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionFilters {
    pub status: Option<DecisionStatus>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub owner_slack_id: Option<String>,
    pub channel_id: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

impl DecisionFilters {
    /// Filters as ordered query pairs, skipping unset and blank values.
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        let optional = [
            ("category", &self.category),
            ("tag", &self.tag),
            ("owner_slack_id", &self.owner_slack_id),
            ("channel_id", &self.channel_id),
            ("date_from", &self.date_from),
            ("date_to", &self.date_to),
        ];
        for (key, value) in optional {
            if let Some(v) = non_blank(value.as_deref()) {
                pairs.push((key, v.to_string()));
            }
        }
        pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs().is_empty()
    }
}

/// A fully specified list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionQuery {
    pub page: u32,
    pub per_page: u32,
    pub filters: DecisionFilters,
}

impl DecisionQuery {
    /// Request path, e.g. `/api/decisions?page=1&per_page=20&status=pending`.
    pub fn to_path(&self) -> String {
        let mut path = format!(
            "/api/decisions?page={}&per_page={}",
            self.page, self.per_page
        );
        for (key, value) in self.filters.pairs() {
            path.push('&');
            path.push_str(key);
            path.push('=');
            path.push_str(&urlencoding::encode(&value));
        }
        path
    }
}

/// Status transitions a client may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionAction {
    Confirm,
    Ignore,
}

impl DecisionAction {
    pub const ALL: [DecisionAction; 2] = [DecisionAction::Confirm, DecisionAction::Ignore];

    /// Parse from the path segment used by the API.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "confirm" => Some(Self::Confirm),
            "ignore" => Some(Self::Ignore),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirm => "confirm",
            Self::Ignore => "ignore",
        }
    }

    /// Button label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Confirm => "Confirm",
            Self::Ignore => "Ignore",
        }
    }

    /// Request path for this action on a decision.
    pub fn path(&self, decision_id: &str) -> String {
        format!("{}/{}", decision_path(decision_id), self.as_str())
    }

    /// Actions offered for a status. Only pending decisions can be acted on.
    pub fn allowed_for(status: DecisionStatus) -> &'static [DecisionAction] {
        match status {
            DecisionStatus::Pending => &Self::ALL,
            _ => &[],
        }
    }
}

/// Path of a single decision.
pub fn decision_path(decision_id: &str) -> String {
    format!("/api/decisions/{}", urlencoding::encode(decision_id))
}

/// Badge palette keyed by status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Warning,
    Success,
    Muted,
    Danger,
}

impl StatusTone {
    pub fn for_status(status: DecisionStatus) -> Self {
        match status {
            DecisionStatus::Pending => Self::Warning,
            DecisionStatus::Active => Self::Success,
            DecisionStatus::Expired => Self::Danger,
            _ => Self::Muted,
        }
    }

    /// CSS class suffix used by the dashboard.
    pub fn css(&self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Success => "success",
            Self::Muted => "muted",
            Self::Danger => "danger",
        }
    }
}

/// Format decisions as a short markdown digest.
pub fn format_decisions_summary(decisions: &[Decision]) -> String {
    if decisions.is_empty() {
        return "No decisions found".to_string();
    }

    let mut output = String::new();
    for decision in decisions.iter().take(5) {
        output.push_str(&format!(
            "- **{}** ({}): {}\n",
            decision.title,
            decision.status.as_str(),
            decision
                .summary
                .as_deref()
                .unwrap_or_default()
                .chars()
                .take(100)
                .collect::<String>()
        ));
    }

    if decisions.len() > 5 {
        output.push_str(&format!("... and {} more decisions\n", decisions.len() - 5));
    }

    output
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(filters: DecisionFilters) -> DecisionQuery {
        DecisionQuery { page: 1, per_page: 20, filters }
    }

    #[test]
    fn test_pending_filter_path() {
        let filters = DecisionFilters {
            status: Some(DecisionStatus::Pending),
            category: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(
            query(filters).to_path(),
            "/api/decisions?page=1&per_page=20&status=pending"
        );
    }

    #[test]
    fn test_parameter_order_and_encoding() {
        let filters = DecisionFilters {
            status: Some(DecisionStatus::Active),
            category: Some("api".into()),
            tag: Some("c++ & rust".into()),
            date_from: Some("2024-01-01".into()),
            ..Default::default()
        };
        let q = DecisionQuery { page: 3, per_page: 50, filters };
        assert_eq!(
            q.to_path(),
            "/api/decisions?page=3&per_page=50&status=active&category=api&tag=c%2B%2B%20%26%20rust&date_from=2024-01-01"
        );
    }

    #[test]
    fn test_blank_filters_are_empty() {
        let filters = DecisionFilters {
            tag: Some("   ".into()),
            ..Default::default()
        };
        assert!(filters.is_empty());
        assert_eq!(query(filters).to_path(), "/api/decisions?page=1&per_page=20");
    }

    #[test]
    fn test_actions_only_for_pending() {
        assert_eq!(
            DecisionAction::allowed_for(DecisionStatus::Pending),
            &[DecisionAction::Confirm, DecisionAction::Ignore]
        );
        for status in [
            DecisionStatus::Active,
            DecisionStatus::Ignored,
            DecisionStatus::Expired,
            DecisionStatus::Unknown,
        ] {
            assert!(DecisionAction::allowed_for(status).is_empty());
        }
        assert_eq!(DecisionAction::Ignore.path("abc"), "/api/decisions/abc/ignore");
        assert_eq!(DecisionAction::parse("confirm"), Some(DecisionAction::Confirm));
        assert_eq!(DecisionAction::parse("delete"), None);
    }

    #[test]
    fn test_status_tones() {
        assert_eq!(StatusTone::for_status(DecisionStatus::Pending).css(), "warning");
        assert_eq!(StatusTone::for_status(DecisionStatus::Active).css(), "success");
        assert_eq!(StatusTone::for_status(DecisionStatus::Expired).css(), "danger");
        assert_eq!(StatusTone::for_status(DecisionStatus::Unknown).css(), "muted");
    }
}
