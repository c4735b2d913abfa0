//! Decision list route handlers.
//!
//! Filters, page and the expanded row live in the query string so every
//! state of the list is a plain link.

use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use ledger_core::decision::model::{Decision, DecisionDetail, DecisionStatus};
use ledger_core::decision::{DecisionAction, DecisionFilters, StatusTone, CATEGORIES};
use ledger_core::view::decisions::{DecisionListView, EMPTY_MESSAGE};
use serde::Deserialize;

use super::{display_date, error_status, render, upstream_status};
use crate::nav::{nav_links, NavLink};
use crate::state::AppState;

const LIST_PATH: &str = "/dashboard/decisions";

// ============================================================
// TEMPLATES
// ============================================================

#[derive(Template)]
#[template(path = "decisions.html")]
struct DecisionsTemplate {
    nav: Vec<NavLink>,
    error: Option<String>,
    empty: bool,
    empty_message: &'static str,
    total: u64,
    status_options: Vec<SelectOption>,
    category_options: Vec<SelectOption>,
    tag: String,
    hidden: Vec<HiddenField>,
    rows: Vec<DecisionRow>,
    pagination: Option<PaginationView>,
}

struct SelectOption {
    value: String,
    label: String,
    selected: bool,
}

/// Current filters and page, carried by action forms.
struct HiddenField {
    name: &'static str,
    value: String,
}

struct PaginationView {
    label: String,
    prev_href: Option<String>,
    next_href: Option<String>,
}

/// View model for a list row.
struct DecisionRow {
    title: String,
    summary: Option<String>,
    owner: Option<String>,
    date: String,
    status: &'static str,
    tone: &'static str,
    category: Option<String>,
    tags: Vec<String>,
    expanded: bool,
    toggle_href: String,
    actions: Vec<ActionButton>,
    detail: Option<DetailPanel>,
}

struct ActionButton {
    href: String,
    label: &'static str,
}

/// View model for the expanded row.
struct DetailPanel {
    rationale: Option<String>,
    impact: Vec<String>,
    confidence: Option<String>,
    source_url: Option<String>,
    channel: Option<String>,
    confirmed: Option<String>,
    links: Vec<LinkView>,
}

struct LinkView {
    url: String,
    label: String,
    kind: String,
}

impl DetailPanel {
    fn from_detail(detail: &DecisionDetail) -> Self {
        let d = &detail.decision;
        let confirmed = d.confirmed_at.as_deref().map(|at| match d.confirmed_by.as_deref() {
            Some(by) => format!("Confirmed by {} on {}", by, display_date(at)),
            None => format!("Confirmed on {}", display_date(at)),
        });
        Self {
            rationale: d.rationale.clone(),
            impact: d.impact_area.clone().unwrap_or_default(),
            confidence: d.confidence.map(|c| format!("{}%", (c * 100.0).round() as i64)),
            source_url: d.source_url.clone(),
            channel: d.source_channel_name.as_deref().map(|c| format!("#{}", c)),
            confirmed,
            links: detail
                .links
                .iter()
                .map(|l| LinkView {
                    url: l.link_url.clone(),
                    label: l.label().to_string(),
                    kind: l.link_type.clone().unwrap_or_else(|| "link".to_string()),
                })
                .collect(),
        }
    }
}

impl DecisionRow {
    fn from_decision(decision: &Decision, view: &DecisionListView) -> Self {
        let expanded = view.is_expanded(&decision.id);
        let toggle_href = if expanded {
            list_href(view.filters(), view.page(), None)
        } else {
            list_href(view.filters(), view.page(), Some(&decision.id))
        };
        Self {
            title: decision.title.clone(),
            summary: decision.summary.clone(),
            owner: decision.owner_label().map(str::to_string),
            date: display_date(&decision.created_at),
            status: decision.status.as_str(),
            tone: StatusTone::for_status(decision.status).css(),
            category: decision.category.clone(),
            tags: decision.tags().to_vec(),
            expanded,
            toggle_href,
            actions: view
                .actions_for(&decision.id)
                .iter()
                .map(|a| ActionButton {
                    href: format!("{}/{}/{}", LIST_PATH, urlencoding::encode(&decision.id), a.as_str()),
                    label: a.label(),
                })
                .collect(),
            detail: if expanded {
                view.detail().map(DetailPanel::from_detail)
            } else {
                None
            },
        }
    }
}

impl DecisionsTemplate {
    fn from_view(view: &DecisionListView) -> Self {
        let filters = view.filters();
        let current_category = filters.category.as_deref().unwrap_or_default();

        let mut status_options = vec![SelectOption {
            value: String::new(),
            label: "All statuses".to_string(),
            selected: filters.status.is_none(),
        }];
        status_options.extend(DecisionStatus::FILTERABLE.iter().map(|s| SelectOption {
            value: s.as_str().to_string(),
            label: capitalize(s.as_str()),
            selected: filters.status == Some(*s),
        }));

        let mut category_options = vec![SelectOption {
            value: String::new(),
            label: "All categories".to_string(),
            selected: current_category.is_empty(),
        }];
        category_options.extend(CATEGORIES.iter().map(|c| SelectOption {
            value: c.to_string(),
            label: capitalize(c),
            selected: *c == current_category,
        }));

        let pagination = view.pagination();
        let pagination = pagination.is_multi_page().then(|| PaginationView {
            label: pagination.label(),
            prev_href: pagination
                .has_previous()
                .then(|| list_href(filters, view.page() - 1, None)),
            next_href: pagination
                .has_next()
                .then(|| list_href(filters, view.page() + 1, None)),
        });

        let mut hidden: Vec<HiddenField> = filters
            .pairs()
            .into_iter()
            .filter(|(name, _)| matches!(*name, "status" | "category" | "tag"))
            .map(|(name, value)| HiddenField { name, value })
            .collect();
        hidden.push(HiddenField { name: "page", value: view.page().to_string() });

        Self {
            nav: nav_links(LIST_PATH),
            error: view.error().map(str::to_string),
            empty: view.is_empty(),
            empty_message: EMPTY_MESSAGE,
            total: view.total(),
            status_options,
            category_options,
            tag: filters.tag.clone().unwrap_or_default(),
            hidden,
            rows: view
                .decisions()
                .iter()
                .map(|d| DecisionRow::from_decision(d, view))
                .collect(),
            pagination,
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ============================================================
// REQUEST TYPES
// ============================================================

/// List state as sent by links, the filter form and action forms.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub page: Option<u32>,
    pub expanded: Option<String>,
}

impl ListParams {
    fn filters(&self) -> DecisionFilters {
        let non_blank = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        DecisionFilters {
            status: non_blank(&self.status)
                .map(|s| DecisionStatus::parse(&s))
                .filter(|s| *s != DecisionStatus::Unknown),
            category: non_blank(&self.category),
            tag: non_blank(&self.tag),
            ..Default::default()
        }
    }

    fn view(&self, per_page: u32) -> DecisionListView {
        DecisionListView::restore(self.filters(), self.page.unwrap_or(1), per_page)
    }
}

/// Link to the list at a given filter, page and expanded row.
pub fn list_href(filters: &DecisionFilters, page: u32, expanded: Option<&str>) -> String {
    let mut params: Vec<String> = filters
        .pairs()
        .into_iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(&value)))
        .collect();
    params.push(format!("page={}", page));
    if let Some(id) = expanded {
        params.push(format!("expanded={}", urlencoding::encode(id)));
    }
    format!("{}?{}", LIST_PATH, params.join("&"))
}

// ============================================================
// HANDLERS
// ============================================================

/// GET /dashboard/decisions - Render the filtered, paginated list.
pub async fn list(State(state): State<AppState>, Query(params): Query<ListParams>) -> Response {
    let api = state.api.as_ref();
    let mut view = params.view(state.config.per_page);
    view.refresh(api).await;
    if let Some(id) = params.expanded.as_deref().filter(|id| !id.is_empty()) {
        view.toggle_expand(api, id).await;
    }

    let status = match view.error() {
        Some(_) => upstream_status(view.error_status()),
        None => StatusCode::OK,
    };
    render(status, &DecisionsTemplate::from_view(&view))
}

/// POST /dashboard/decisions/{id}/{action} - Confirm or ignore a decision.
///
/// Redirects back to the list on success; re-renders it with the error
/// otherwise.
pub async fn act(
    State(state): State<AppState>,
    Path((id, action)): Path<(String, String)>,
    Form(params): Form<ListParams>,
) -> Response {
    let Some(action) = DecisionAction::parse(&action) else {
        return (StatusCode::NOT_FOUND, Html("Unknown action".to_string())).into_response();
    };

    let api = state.api.as_ref();
    let mut view = params.view(state.config.per_page);
    view.refresh(api).await;

    match view.act(api, &id, action).await {
        Ok(_) => Redirect::to(&list_href(view.filters(), view.page(), None)).into_response(),
        Err(e) => render(error_status(&e), &DecisionsTemplate::from_view(&view)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::{get, post_form, router, send};
    use ledger_core::decision::model::DecisionLink;
    use ledger_core::testing::{fixtures, MemoryApi};
    use std::sync::Arc;

    #[test]
    fn test_list_href_keeps_filters() {
        let filters = DecisionFilters {
            status: Some(DecisionStatus::Pending),
            tag: Some("data eng".into()),
            ..Default::default()
        };
        assert_eq!(
            list_href(&filters, 2, Some("d1")),
            "/dashboard/decisions?status=pending&tag=data%20eng&page=2&expanded=d1"
        );
    }

    #[test]
    fn test_blank_and_unknown_params_are_unset() {
        let params = ListParams {
            status: Some("bogus".into()),
            category: Some("  ".into()),
            ..Default::default()
        };
        assert!(params.filters().is_empty());
    }

    #[tokio::test]
    async fn test_list_renders_rows_and_actions() {
        let api = Arc::new(MemoryApi::new().with_decisions(fixtures::pending_decisions(2)));
        let (status, _, body) =
            send(router(api.clone()), get("/dashboard/decisions?status=pending&category=")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Decision 1"));
        assert!(body.contains("Decision 2"));
        assert!(body.contains(r#"action="/dashboard/decisions/d1/confirm""#));
        assert!(body.contains(r#"action="/dashboard/decisions/d2/ignore""#));
        assert_eq!(
            api.requests(),
            ["GET /api/decisions?page=1&per_page=20&status=pending"]
        );
    }

    #[tokio::test]
    async fn test_empty_list_message() {
        let api = Arc::new(MemoryApi::new());
        let (_, _, body) = send(router(api), get("/dashboard/decisions")).await;
        assert!(body.contains("No decisions found"));
    }

    #[tokio::test]
    async fn test_active_decision_has_no_actions() {
        let api = Arc::new(MemoryApi::new().with_decisions(vec![fixtures::decision(
            "a1",
            "Use Postgres",
            DecisionStatus::Active,
        )]));
        let (_, _, body) = send(router(api), get("/dashboard/decisions")).await;
        assert!(body.contains("Use Postgres"));
        assert!(!body.contains("/dashboard/decisions/a1/confirm"));
    }

    #[tokio::test]
    async fn test_expanded_row_shows_links() {
        let mut detail = DecisionDetail {
            decision: fixtures::decision("d1", "Adopt gRPC", DecisionStatus::Pending),
            links: Vec::new(),
        };
        detail.decision.rationale = Some("Latency budget".into());
        detail.links.push(DecisionLink {
            id: "l1".into(),
            link_type: Some("jira".into()),
            link_url: "https://acme.atlassian.net/browse/ENG-1".into(),
            link_title: Some("ENG-1".into()),
            link_metadata: None,
            created_at: "2024-06-01T12:00:00Z".into(),
        });
        let api = Arc::new(MemoryApi::new().with_details(vec![detail]));

        let (_, _, body) = send(router(api.clone()), get("/dashboard/decisions?expanded=d1")).await;
        assert!(body.contains("Latency budget"));
        assert!(body.contains("ENG-1"));
        assert!(api.requests().contains(&"GET /api/decisions/d1".to_string()));
    }

    #[tokio::test]
    async fn test_pagination_links() {
        let api = Arc::new(MemoryApi::new().with_decisions(fixtures::pending_decisions(45)));
        let (_, _, body) = send(router(api), get("/dashboard/decisions?page=2")).await;
        assert!(body.contains("Page 2 of 3"));
        assert!(body.contains(r#"href="/dashboard/decisions?page=1""#));
        assert!(body.contains(r#"href="/dashboard/decisions?page=3""#));
    }

    #[tokio::test]
    async fn test_page_past_the_end_renders_last_page() {
        let api = Arc::new(MemoryApi::new().with_decisions(fixtures::pending_decisions(45)));
        let (status, _, body) = send(router(api.clone()), get("/dashboard/decisions?page=99")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Page 3 of 3"));
        assert!(body.contains("Decision 45"));
        assert!(!body.contains("No decisions found"));
        assert_eq!(
            api.requests(),
            [
                "GET /api/decisions?page=99&per_page=20",
                "GET /api/decisions?page=3&per_page=20",
            ]
        );
    }

    #[tokio::test]
    async fn test_confirming_last_row_redirects_to_remaining_page() {
        let api = Arc::new(MemoryApi::new().with_decisions(fixtures::pending_decisions(21)));
        let (status, location, _) = send(
            router(api.clone()),
            post_form("/dashboard/decisions/d21/confirm", "status=pending&page=2"),
        )
        .await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some("/dashboard/decisions?status=pending&page=1"));

        let (_, _, body) = send(router(api), get("/dashboard/decisions?status=pending&page=1")).await;
        assert!(!body.contains("No decisions found"));
        assert!(body.contains("Decision 20"));
    }

    #[tokio::test]
    async fn test_expired_session_is_unauthorized_not_bad_gateway() {
        let api = Arc::new(MemoryApi::new().with_decisions(fixtures::pending_decisions(1)));
        api.fail("GET /api/decisions", 401, "Not authenticated");
        let (status, _, body) = send(router(api), get("/dashboard/decisions")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("401: Not authenticated"));
    }

    #[tokio::test]
    async fn test_confirm_redirects_back_with_filters() {
        let api = Arc::new(MemoryApi::new().with_decisions(fixtures::pending_decisions(1)));
        let (status, location, _) = send(
            router(api.clone()),
            post_form("/dashboard/decisions/d1/confirm", "status=pending&page=1"),
        )
        .await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some("/dashboard/decisions?status=pending&page=1"));
        assert_eq!(api.decision("d1").unwrap().status, DecisionStatus::Active);
    }

    #[tokio::test]
    async fn test_failed_action_rerenders_with_error() {
        let api = Arc::new(MemoryApi::new().with_decisions(fixtures::pending_decisions(1)));
        api.fail("POST /api/decisions/d1/ignore", 404, "gone");
        let (status, _, body) =
            send(router(api), post_form("/dashboard/decisions/d1/ignore", "page=1")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("404: gone"));
    }

    #[tokio::test]
    async fn test_unknown_action_is_not_found() {
        let api = Arc::new(MemoryApi::new());
        let (status, _, _) =
            send(router(api), post_form("/dashboard/decisions/d1/archive", "")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
