//! Decision list view: filters, pagination, row expansion and actions.

use tracing::{debug, info};

use super::sequence::{RequestSequencer, Ticket};
use crate::api::LedgerApi;
use crate::config::DEFAULT_PER_PAGE;
use crate::decision::model::{Decision, DecisionDetail, DecisionStatus, PaginatedDecisions};
use crate::decision::{DecisionAction, DecisionFilters, DecisionQuery};
use crate::error::{LedgerError, LedgerResult};
use crate::pagination::Pagination;

/// Shown when a fetch succeeded with no rows.
pub const EMPTY_MESSAGE: &str = "No decisions found";

/// State of the decision list.
#[derive(Debug, Clone)]
pub struct DecisionListView {
    filters: DecisionFilters,
    page: u32,
    per_page: u32,
    decisions: Vec<Decision>,
    total: u64,
    expanded: Option<String>,
    detail: Option<DecisionDetail>,
    error: Option<String>,
    error_status: Option<u16>,
    list_seq: RequestSequencer,
    detail_seq: RequestSequencer,
}

impl Default for DecisionListView {
    fn default() -> Self {
        Self::new(DEFAULT_PER_PAGE)
    }
}

impl DecisionListView {
    pub fn new(per_page: u32) -> Self {
        Self {
            filters: DecisionFilters::default(),
            page: 1,
            per_page: per_page.max(1),
            decisions: Vec::new(),
            total: 0,
            expanded: None,
            detail: None,
            error: None,
            error_status: None,
            list_seq: RequestSequencer::new(),
            detail_seq: RequestSequencer::new(),
        }
    }

    /// Restore a view at a given filter and page, e.g. from a URL.
    ///
    /// Pages past the end are pulled back by the first [`refresh`](Self::refresh).
    pub fn restore(filters: DecisionFilters, page: u32, per_page: u32) -> Self {
        let mut view = Self::new(per_page);
        view.filters = filters;
        view.page = page.max(1);
        view
    }

    // ----- filters -----

    pub fn filters(&self) -> &DecisionFilters {
        &self.filters
    }

    pub fn set_status(&mut self, status: Option<DecisionStatus>) {
        self.filters.status = status;
        self.reset_page();
    }

    pub fn set_category(&mut self, category: Option<String>) {
        self.filters.category = category;
        self.reset_page();
    }

    pub fn set_tag(&mut self, tag: Option<String>) {
        self.filters.tag = tag;
        self.reset_page();
    }

    pub fn set_filters(&mut self, filters: DecisionFilters) {
        self.filters = filters;
        self.reset_page();
    }

    /// Any filter change starts over from page 1 and supersedes in-flight fetches.
    fn reset_page(&mut self) {
        self.page = 1;
        self.list_seq.invalidate();
    }

    // ----- pagination -----

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.total, self.page, self.per_page)
    }

    /// Advance one page. Returns false at the last page.
    pub fn next_page(&mut self) -> bool {
        let pagination = self.pagination();
        if !pagination.has_next() {
            return false;
        }
        self.page = (self.page + 1).min(pagination.total_pages());
        self.list_seq.invalidate();
        true
    }

    /// Go back one page. Returns false at page 1.
    pub fn previous_page(&mut self) -> bool {
        if !self.pagination().has_previous() {
            return false;
        }
        self.page = (self.page - 1).max(1);
        self.list_seq.invalidate();
        true
    }

    /// Pull the page back into `[1, last_page]` once a fetch has shown how
    /// many pages exist. Returns true when the page moved.
    pub fn clamp_page(&mut self) -> bool {
        if self.error.is_some() {
            return false;
        }
        let pagination = self.pagination();
        let clamped = pagination.clamp(self.page);
        if clamped == self.page {
            return false;
        }
        debug!(page = self.page, last_page = pagination.last_page(), "Page is past the end");
        self.page = clamped;
        self.list_seq.invalidate();
        true
    }

    /// The request the current state maps to.
    pub fn query(&self) -> DecisionQuery {
        DecisionQuery {
            page: self.page,
            per_page: self.per_page,
            filters: self.filters.clone(),
        }
    }

    // ----- list fetch -----

    /// Start a list fetch for the current state.
    pub fn begin_fetch(&mut self) -> (Ticket, DecisionQuery) {
        (self.list_seq.issue(), self.query())
    }

    /// Apply a list response. Returns false when the ticket was superseded.
    pub fn finish_fetch(
        &mut self,
        ticket: Ticket,
        result: LedgerResult<PaginatedDecisions>,
    ) -> bool {
        if !self.list_seq.is_current(ticket) {
            debug!(?ticket, "Dropping superseded decision list response");
            return false;
        }
        match result {
            Ok(page) => {
                self.decisions = page.items;
                self.total = page.total;
                self.error = None;
                self.error_status = None;
            }
            Err(e) => {
                self.error_status = e.status();
                self.error = Some(e.to_string());
            }
        }
        true
    }

    /// Fetch the current page and replace the list.
    ///
    /// When the list has shrunk below the current page, the last page is
    /// fetched instead.
    pub async fn refresh<A: LedgerApi + ?Sized>(&mut self, api: &A) {
        self.fetch(api).await;
        if self.clamp_page() {
            self.fetch(api).await;
        }
    }

    async fn fetch<A: LedgerApi + ?Sized>(&mut self, api: &A) {
        let (ticket, query) = self.begin_fetch();
        let result = api.list_decisions(&query).await;
        self.finish_fetch(ticket, result);
    }

    // ----- expansion -----

    pub fn expanded(&self) -> Option<&str> {
        self.expanded.as_deref()
    }

    /// Detail of the expanded row, once loaded.
    pub fn detail(&self) -> Option<&DecisionDetail> {
        let expanded = self.expanded.as_deref()?;
        self.detail
            .as_ref()
            .filter(|d| d.decision.id == expanded)
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.as_deref() == Some(id)
    }

    /// Toggle a row. Collapsing returns `None` and needs no request;
    /// expanding returns the ticket of the detail fetch to start.
    pub fn begin_toggle(&mut self, id: &str) -> Option<Ticket> {
        self.detail = None;
        if self.is_expanded(id) {
            self.expanded = None;
            self.detail_seq.invalidate();
            return None;
        }
        self.expanded = Some(id.to_string());
        Some(self.detail_seq.issue())
    }

    /// Apply a detail response. Failures clear the panel silently.
    pub fn finish_detail(&mut self, ticket: Ticket, result: LedgerResult<DecisionDetail>) -> bool {
        if !self.detail_seq.is_current(ticket) {
            debug!(?ticket, "Dropping superseded decision detail response");
            return false;
        }
        self.detail = match result {
            Ok(detail) => Some(detail),
            Err(e) => {
                debug!(error = %e, "Decision detail unavailable");
                None
            }
        };
        true
    }

    /// Expand a row and load its detail, or collapse it if already expanded.
    pub async fn toggle_expand<A: LedgerApi + ?Sized>(&mut self, api: &A, id: &str) {
        if let Some(ticket) = self.begin_toggle(id) {
            let result = api.get_decision(id).await;
            self.finish_detail(ticket, result);
        }
    }

    // ----- actions -----

    /// Actions offered for a listed decision.
    pub fn actions_for(&self, id: &str) -> &'static [DecisionAction] {
        self.decisions
            .iter()
            .find(|d| d.id == id)
            .map(|d| DecisionAction::allowed_for(d.status))
            .unwrap_or(&[])
    }

    /// Request a status transition, then re-fetch the current page.
    ///
    /// There is no optimistic update: the row may drop out of the list when
    /// its new status no longer matches the filter. A failed request is
    /// surfaced as the view error and skips the re-fetch.
    pub async fn act<A: LedgerApi + ?Sized>(
        &mut self,
        api: &A,
        id: &str,
        action: DecisionAction,
    ) -> LedgerResult<Decision> {
        if !self.actions_for(id).contains(&action) {
            let err = LedgerError::validation(format!(
                "cannot {} decision {}: only pending decisions in the current list can be confirmed or ignored",
                action.as_str(),
                id
            ));
            self.error = Some(err.to_string());
            return Err(err);
        }

        match api.decision_action(id, action).await {
            Ok(updated) => {
                info!(decision_id = %id, action = action.as_str(), status = %updated.status, "Decision updated");
                self.refresh(api).await;
                Ok(updated)
            }
            Err(e) => {
                self.error_status = e.status();
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    // ----- rendering -----

    pub fn decisions(&self) -> &[Decision] {
        &self.decisions
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// HTTP status of the API failure behind [`error`](Self::error), if any.
    pub fn error_status(&self) -> Option<u16> {
        self.error_status
    }

    /// No rows and no error: render [`EMPTY_MESSAGE`].
    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty() && self.error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixtures, MemoryApi};

    fn api_with(count: usize) -> MemoryApi {
        MemoryApi::new().with_decisions(fixtures::pending_decisions(count))
    }

    #[tokio::test]
    async fn test_initial_fetch_request_path() {
        let api = api_with(3);
        let mut view = DecisionListView::default();
        view.set_status(Some(DecisionStatus::Pending));
        view.set_category(Some(String::new()));
        view.refresh(&api).await;

        assert_eq!(
            api.requests(),
            ["GET /api/decisions?page=1&per_page=20&status=pending"]
        );
        assert_eq!(view.decisions().len(), 3);
        assert_eq!(view.total(), 3);
    }

    #[tokio::test]
    async fn test_filter_change_resets_page() {
        let api = api_with(45);
        let mut view = DecisionListView::default();
        view.refresh(&api).await;
        assert!(view.next_page());
        assert!(view.next_page());
        assert_eq!(view.page(), 3);

        view.set_tag(Some("backend".into()));
        assert_eq!(view.page(), 1);

        view.next_page();
        view.set_category(Some("api".into()));
        assert_eq!(view.page(), 1);

        view.set_status(Some(DecisionStatus::Active));
        assert_eq!(view.page(), 1);
    }

    #[tokio::test]
    async fn test_pagination_boundaries() {
        let api = api_with(45);
        let mut view = DecisionListView::default();
        view.refresh(&api).await;

        assert!(!view.pagination().has_previous());
        assert!(!view.previous_page());
        assert_eq!(view.page(), 1);

        assert!(view.next_page());
        assert!(view.next_page());
        assert!(!view.pagination().has_next());
        assert!(!view.next_page());
        assert_eq!(view.page(), 3);

        view.refresh(&api).await;
        assert_eq!(view.decisions().len(), 5);
    }

    #[tokio::test]
    async fn test_empty_result_shows_empty_state() {
        let api = MemoryApi::new();
        let mut view = DecisionListView::default();
        view.refresh(&api).await;
        assert!(view.is_empty());
        assert!(!view.pagination().is_multi_page());
    }

    #[tokio::test]
    async fn test_fetch_error_is_not_empty_state() {
        let api = api_with(2);
        api.fail("GET /api/decisions", 500, "boom");
        let mut view = DecisionListView::default();
        view.refresh(&api).await;
        assert_eq!(view.error(), Some("500: boom"));
        assert_eq!(view.error_status(), Some(500));
        assert!(!view.is_empty());

        api.heal();
        view.refresh(&api).await;
        assert_eq!(view.error(), None);
        assert_eq!(view.error_status(), None);
        assert_eq!(view.decisions().len(), 2);
    }

    #[tokio::test]
    async fn test_toggle_collapses_without_request() {
        let api = api_with(2);
        let mut view = DecisionListView::default();
        view.refresh(&api).await;

        view.toggle_expand(&api, "d1").await;
        assert_eq!(view.expanded(), Some("d1"));
        assert_eq!(view.detail().map(|d| d.decision.id.as_str()), Some("d1"));
        let before = api.request_count();

        view.toggle_expand(&api, "d1").await;
        assert_eq!(api.request_count(), before);
        assert_eq!(view.expanded(), None);
        assert!(view.detail().is_none());
    }

    #[tokio::test]
    async fn test_expanding_another_row_replaces_detail() {
        let api = api_with(2);
        let mut view = DecisionListView::default();
        view.refresh(&api).await;

        view.toggle_expand(&api, "d1").await;
        view.toggle_expand(&api, "d2").await;
        assert_eq!(view.expanded(), Some("d2"));
        assert_eq!(view.detail().map(|d| d.decision.id.as_str()), Some("d2"));
    }

    #[tokio::test]
    async fn test_detail_failure_clears_panel_silently() {
        let api = api_with(1);
        api.fail("GET /api/decisions/d1", 404, "missing");
        let mut view = DecisionListView::default();
        view.refresh(&api).await;

        view.toggle_expand(&api, "d1").await;
        assert_eq!(view.expanded(), Some("d1"));
        assert!(view.detail().is_none());
        assert_eq!(view.error(), None);
    }

    #[tokio::test]
    async fn test_stale_list_response_is_dropped() {
        let mut view = DecisionListView::default();
        let (old_ticket, _) = view.begin_fetch();
        view.set_status(Some(DecisionStatus::Active));
        let (new_ticket, query) = view.begin_fetch();
        assert_eq!(query.filters.status, Some(DecisionStatus::Active));

        let newer = PaginatedDecisions {
            items: vec![fixtures::decision("a1", "Active one", DecisionStatus::Active)],
            total: 1,
            page: 1,
            per_page: 20,
        };
        assert!(view.finish_fetch(new_ticket, Ok(newer)));

        let stale = PaginatedDecisions {
            items: fixtures::pending_decisions(4),
            total: 4,
            page: 1,
            per_page: 20,
        };
        assert!(!view.finish_fetch(old_ticket, Ok(stale)));
        assert_eq!(view.decisions().len(), 1);
        assert_eq!(view.decisions()[0].id, "a1");
    }

    #[tokio::test]
    async fn test_stale_detail_after_collapse_is_dropped() {
        let mut view = DecisionListView::default();
        let ticket = view.begin_toggle("d1").unwrap();
        assert!(view.begin_toggle("d1").is_none());

        let detail = DecisionDetail {
            decision: fixtures::decision("d1", "One", DecisionStatus::Pending),
            links: Vec::new(),
        };
        assert!(!view.finish_detail(ticket, Ok(detail)));
        assert!(view.detail().is_none());
    }

    #[tokio::test]
    async fn test_confirm_refetches_and_row_leaves_pending_filter() {
        let api = api_with(2);
        let mut view = DecisionListView::default();
        view.set_status(Some(DecisionStatus::Pending));
        view.refresh(&api).await;
        assert_eq!(view.actions_for("d1"), &[DecisionAction::Confirm, DecisionAction::Ignore]);

        let updated = view.act(&api, "d1", DecisionAction::Confirm).await.unwrap();
        assert_eq!(updated.status, DecisionStatus::Active);
        assert_eq!(
            api.requests(),
            [
                "GET /api/decisions?page=1&per_page=20&status=pending",
                "POST /api/decisions/d1/confirm",
                "GET /api/decisions?page=1&per_page=20&status=pending",
            ]
        );
        assert_eq!(view.decisions().len(), 1);
        assert_eq!(view.decisions()[0].id, "d2");
    }

    #[tokio::test]
    async fn test_actions_only_offered_for_pending() {
        let api = MemoryApi::new().with_decisions(vec![
            fixtures::decision("a1", "Active", DecisionStatus::Active),
            fixtures::decision("x1", "Expired", DecisionStatus::Expired),
        ]);
        let mut view = DecisionListView::default();
        view.refresh(&api).await;
        assert!(view.actions_for("a1").is_empty());
        assert!(view.actions_for("x1").is_empty());
        assert!(view.actions_for("nope").is_empty());

        api.clear_requests();
        let err = view.act(&api, "a1", DecisionAction::Ignore).await.unwrap_err();
        assert!(matches!(err, LedgerError::ValidationError(_)));
        assert_eq!(api.request_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_action_surfaces_error_and_skips_refetch() {
        let api = api_with(1);
        let mut view = DecisionListView::default();
        view.refresh(&api).await;
        api.fail("POST /api/decisions/d1/ignore", 404, r#"{"detail":"Decision not found"}"#);
        api.clear_requests();

        assert!(view.act(&api, "d1", DecisionAction::Ignore).await.is_err());
        assert_eq!(view.error(), Some(r#"404: {"detail":"Decision not found"}"#));
        assert_eq!(api.requests(), ["POST /api/decisions/d1/ignore"]);
    }

    #[tokio::test]
    async fn test_page_past_the_end_falls_back_to_last_page() {
        let api = api_with(45);
        let mut view = DecisionListView::restore(DecisionFilters::default(), 99, 20);
        view.refresh(&api).await;

        assert_eq!(view.page(), 3);
        assert_eq!(view.decisions().len(), 5);
        assert_eq!(view.pagination().label(), "Page 3 of 3");
        assert_eq!(
            api.requests(),
            [
                "GET /api/decisions?page=99&per_page=20",
                "GET /api/decisions?page=3&per_page=20",
            ]
        );
    }

    #[tokio::test]
    async fn test_emptying_last_page_moves_back() {
        let api = api_with(21);
        let filters = DecisionFilters {
            status: Some(DecisionStatus::Pending),
            ..Default::default()
        };
        let mut view = DecisionListView::restore(filters, 2, 20);
        view.refresh(&api).await;
        assert_eq!(view.decisions().len(), 1);
        assert_eq!(view.decisions()[0].id, "d21");

        view.act(&api, "d21", DecisionAction::Confirm).await.unwrap();
        assert_eq!(view.page(), 1);
        assert_eq!(view.decisions().len(), 20);
        assert!(!view.is_empty());
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_page() {
        let api = api_with(45);
        api.fail("GET /api/decisions", 503, "down");
        let mut view = DecisionListView::restore(DecisionFilters::default(), 2, 20);
        view.refresh(&api).await;
        assert_eq!(view.page(), 2);
        assert_eq!(api.request_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_action_records_status() {
        let api = api_with(1);
        let mut view = DecisionListView::default();
        view.refresh(&api).await;
        api.fail("POST /api/decisions/d1/confirm", 401, "Not authenticated");
        assert!(view.act(&api, "d1", DecisionAction::Confirm).await.is_err());
        assert_eq!(view.error_status(), Some(401));
    }

    #[test]
    fn test_restore_clamps_page_to_one() {
        let view = DecisionListView::restore(DecisionFilters::default(), 0, 20);
        assert_eq!(view.page(), 1);
        assert_eq!(view.query().to_path(), "/api/decisions?page=1&per_page=20");
    }
}
