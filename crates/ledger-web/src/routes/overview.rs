//! Analytics overview page.

use askama::Template;
use axum::{extract::State, http::StatusCode, response::Response};
use ledger_core::analytics::{self, model::AnalyticsOverview, Stat};
use ledger_core::view::overview::{OverviewView, NO_DATA};

use super::render;
use crate::nav::{nav_links, NavLink};
use crate::state::AppState;

#[derive(Template)]
#[template(path = "overview.html")]
struct OverviewTemplate {
    nav: Vec<NavLink>,
    message: Option<String>,
    stats: Vec<Stat>,
    owners: Vec<OwnerRow>,
    categories: Vec<CategoryRow>,
    no_data: &'static str,
}

struct OwnerRow {
    label: String,
    count: u64,
}

struct CategoryRow {
    label: String,
    count: u64,
    percent: String,
}

impl OverviewTemplate {
    fn from_view(view: &OverviewView) -> Self {
        let mut template = Self {
            nav: nav_links("/dashboard"),
            message: view.message(),
            stats: Vec::new(),
            owners: Vec::new(),
            categories: Vec::new(),
            no_data: NO_DATA,
        };
        if let Some(overview) = view.overview() {
            template.fill(overview);
        }
        template
    }

    fn fill(&mut self, overview: &AnalyticsOverview) {
        self.stats = analytics::stats(overview);
        self.owners = overview
            .top_owners
            .iter()
            .map(|o| OwnerRow { label: o.label().to_string(), count: o.count })
            .collect();
        let all = &overview.decisions_by_category;
        self.categories = all
            .iter()
            .map(|c| CategoryRow {
                label: c.label().to_string(),
                count: c.count,
                percent: format!("{:.0}", analytics::category_bar_percent(c, all)),
            })
            .collect();
    }
}

/// GET /dashboard - Headline stats, top owners and categories.
pub async fn index(State(state): State<AppState>) -> Response {
    let view = OverviewView::load(state.api.as_ref()).await;
    let status = match view {
        OverviewView::Failed(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::OK,
    };
    render(status, &OverviewTemplate::from_view(&view))
}
