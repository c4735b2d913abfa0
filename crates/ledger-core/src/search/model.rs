//! Search wire models.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub limit: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub offset: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<SearchFilters>,
}

/// Optional narrowing of a search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_slack_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// A ranked decision in a search answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchDecision {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub rationale: Option<String>,
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    pub combined_score: f64,
}

impl SearchDecision {
    /// Relevance as a whole percentage.
    pub fn relevance_percent(&self) -> i64 {
        (self.combined_score * 100.0).round() as i64
    }

    pub fn tags(&self) -> &[String] {
        self.tags.as_deref().unwrap_or_default()
    }
}

/// Synthesized answer plus its source decisions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub answer: String,
    pub decisions: Vec<SearchDecision>,
    pub total_count: u64,
    pub response_time_ms: u64,
}

impl SearchResult {
    /// "{n} results in {ms}ms".
    pub fn timing_line(&self) -> String {
        format!("{} results in {}ms", self.decisions.len(), self.response_time_ms)
    }
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}
