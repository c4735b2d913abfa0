//! Workspace analytics.

pub mod model;

use model::{AnalyticsOverview, CategoryCount};

pub const OVERVIEW_PATH: &str = "/api/analytics/overview";

/// A headline number on the overview page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stat {
    pub label: &'static str,
    pub value: String,
}

/// The four headline stats, in display order.
pub fn stats(overview: &AnalyticsOverview) -> Vec<Stat> {
    vec![
        Stat { label: "Total Decisions", value: overview.total_decisions.to_string() },
        Stat { label: "This Week", value: overview.decisions_this_week.to_string() },
        Stat { label: "Queries This Week", value: overview.queries_this_week.to_string() },
        Stat {
            label: "Confirmation Rate",
            value: format!("{}%", (overview.confirmation_rate * 100.0).round() as i64),
        },
    ]
}

/// Bar width of a category as a percentage of the largest count.
pub fn category_bar_percent(category: &CategoryCount, all: &[CategoryCount]) -> f64 {
    let max = all.iter().map(|c| c.count).max().unwrap_or(0).max(1);
    category.count as f64 / max as f64 * 100.0
}
