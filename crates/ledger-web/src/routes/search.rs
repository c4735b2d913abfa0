//! Search page.

use askama::Template;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Response,
};
use ledger_core::search::{model::SearchDecision, IDLE_PROMPT};
use ledger_core::view::search::SearchView;
use serde::Deserialize;

use super::{display_date, render};
use crate::nav::{nav_links, NavLink};
use crate::state::AppState;

#[derive(Template)]
#[template(path = "search.html")]
struct SearchTemplate {
    nav: Vec<NavLink>,
    query: String,
    idle: bool,
    prompt: &'static str,
    error: Option<String>,
    answer: Option<String>,
    timing: String,
    results: Vec<ResultRow>,
}

struct ResultRow {
    title: String,
    summary: Option<String>,
    owner: Option<String>,
    date: Option<String>,
    relevance: i64,
    tags: Vec<String>,
    source_url: Option<String>,
}

impl ResultRow {
    fn from_decision(d: &SearchDecision) -> Self {
        Self {
            title: d.title.clone(),
            summary: d.summary.clone(),
            owner: d.owner_name.clone(),
            date: d.created_at.as_deref().map(display_date),
            relevance: d.relevance_percent(),
            tags: d.tags().to_vec(),
            source_url: d.source_url.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// GET /dashboard/search?q= - Ask a question; blank queries show the prompt.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let mut view = SearchView::new(state.config.search_limit);
    view.set_query(params.q.unwrap_or_default());
    view.submit(state.api.as_ref()).await;

    let result = view.result();
    let template = SearchTemplate {
        nav: nav_links("/dashboard/search"),
        query: view.query().to_string(),
        idle: view.is_idle(),
        prompt: IDLE_PROMPT,
        error: view.error().map(str::to_string),
        answer: result.map(|r| r.answer.clone()),
        timing: result.map(|r| r.timing_line()).unwrap_or_default(),
        results: result
            .map(|r| r.decisions.iter().map(ResultRow::from_decision).collect())
            .unwrap_or_default(),
    };
    let status = if view.error().is_some() {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::OK
    };
    render(status, &template)
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::{get, router, send};
    use axum::http::StatusCode;
    use ledger_core::search::model::{SearchDecision, SearchResult};
    use ledger_core::testing::MemoryApi;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_blank_query_shows_prompt_without_request() {
        let api = Arc::new(MemoryApi::new());
        let (status, _, body) = send(router(api.clone()), get("/dashboard/search?q=%20%20")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Ask a question about your team"));
        assert_eq!(api.request_count(), 0);
    }

    #[tokio::test]
    async fn test_answer_and_results() {
        let api = Arc::new(MemoryApi::new().with_search_result(SearchResult {
            answer: "Payments run on Stripe".into(),
            decisions: vec![SearchDecision {
                id: "d1".into(),
                title: "Move billing to Stripe".into(),
                summary: None,
                rationale: None,
                owner_name: Some("Grace".into()),
                tags: Some(vec!["billing".into()]),
                source_url: None,
                created_at: Some("2024-03-04T10:00:00Z".into()),
                combined_score: 0.873,
            }],
            total_count: 1,
            response_time_ms: 88,
        }));
        let (_, _, body) = send(router(api), get("/dashboard/search?q=billing")).await;
        assert!(body.contains("Payments run on Stripe"));
        assert!(body.contains("Move billing to Stripe"));
        assert!(body.contains("87% match"));
        assert!(body.contains("1 results in 88ms"));
    }

    #[tokio::test]
    async fn test_search_failure() {
        let api = Arc::new(MemoryApi::new());
        api.fail("POST /api/search", 500, "index offline");
        let (status, _, body) = send(router(api), get("/dashboard/search?q=why")).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body.contains("500: index offline"));
    }
}
