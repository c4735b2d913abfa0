//! Decision wire models.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A recorded engineering decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub rationale: Option<String>,
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub owner_slack_id: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub impact_area: Option<Vec<String>>,
    pub status: DecisionStatus,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub source_channel_name: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub confirmed_at: Option<String>,
    #[serde(default)]
    pub confirmed_by: Option<String>,
}

impl Decision {
    /// Tags, or an empty slice when the server sent none.
    pub fn tags(&self) -> &[String] {
        self.tags.as_deref().unwrap_or_default()
    }

    /// Owner shown in lists: name first, then Slack id.
    pub fn owner_label(&self) -> Option<&str> {
        self.owner_name.as_deref().or(self.owner_slack_id.as_deref())
    }

    /// Creation date for display.
    pub fn created_date(&self) -> Option<NaiveDate> {
        parse_date(&self.created_at)
    }

    /// Whether confirm/ignore may be requested.
    pub fn is_pending(&self) -> bool {
        self.status == DecisionStatus::Pending
    }
}

/// Lifecycle status. Transitions are owned by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionStatus {
    Pending,
    Active,
    Ignored,
    Expired,
    Deleted,
    #[serde(other)]
    Unknown,
}

impl DecisionStatus {
    /// Statuses offered as list filters.
    pub const FILTERABLE: [DecisionStatus; 4] = [
        DecisionStatus::Pending,
        DecisionStatus::Active,
        DecisionStatus::Ignored,
        DecisionStatus::Expired,
    ];

    /// Parse from string. Unrecognized values map to `Unknown`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "pending" => Self::Pending,
            "active" => Self::Active,
            "ignored" => Self::Ignored,
            "expired" => Self::Expired,
            "deleted" => Self::Deleted,
            _ => Self::Unknown,
        }
    }

    /// Convert to string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Ignored => "ignored",
            Self::Expired => "expired",
            Self::Deleted => "deleted",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for DecisionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A link attached to a decision (Jira ticket, PR, thread, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionLink {
    pub id: String,
    #[serde(default)]
    pub link_type: Option<String>,
    pub link_url: String,
    #[serde(default)]
    pub link_title: Option<String>,
    #[serde(default)]
    pub link_metadata: Option<Map<String, Value>>,
    pub created_at: String,
}

impl DecisionLink {
    /// Title if present, otherwise the URL.
    pub fn label(&self) -> &str {
        self.link_title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.link_url)
    }
}

/// A decision with its links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionDetail {
    #[serde(flatten)]
    pub decision: Decision,
    #[serde(default)]
    pub links: Vec<DecisionLink>,
}

/// One page of decisions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedDecisions {
    pub items: Vec<Decision>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}

/// Partial update sent with `PATCH /api/decisions/{id}`.
/// Unset fields are left untouched by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecisionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact_area: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DecisionStatus>,
}

impl DecisionUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Parse a server timestamp into a calendar date.
///
/// Accepts RFC 3339 and naive `YYYY-MM-DDTHH:MM:SS[.f]` forms.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(raw.get(..10)?, "%Y-%m-%d").ok()
}
