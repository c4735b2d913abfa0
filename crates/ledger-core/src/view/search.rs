//! Search view state.

use tracing::debug;

use super::sequence::{RequestSequencer, Ticket};
use crate::api::LedgerApi;
use crate::config::DEFAULT_SEARCH_LIMIT;
use crate::error::LedgerResult;
use crate::search::{build_request, model::{SearchRequest, SearchResult}};

#[derive(Debug, Clone)]
pub struct SearchView {
    query: String,
    limit: u32,
    result: Option<SearchResult>,
    loading: bool,
    error: Option<String>,
    seq: RequestSequencer,
}

impl Default for SearchView {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_LIMIT)
    }
}

impl SearchView {
    pub fn new(limit: u32) -> Self {
        Self {
            query: String::new(),
            limit: limit.max(1),
            result: None,
            loading: false,
            error: None,
            seq: RequestSequencer::new(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Submission is possible with a non-blank query and nothing in flight.
    pub fn can_submit(&self) -> bool {
        !self.loading && !self.query.trim().is_empty()
    }

    /// Start a search. Returns `None` when submission is not allowed.
    pub fn begin_search(&mut self) -> Option<(Ticket, SearchRequest)> {
        if !self.can_submit() {
            return None;
        }
        let request = build_request(&self.query, self.limit)?;
        self.loading = true;
        self.error = None;
        Some((self.seq.issue(), request))
    }

    /// Apply a search response. A failure keeps the previous result visible.
    pub fn finish_search(&mut self, ticket: Ticket, result: LedgerResult<SearchResult>) -> bool {
        if !self.seq.is_current(ticket) {
            debug!(?ticket, "Dropping superseded search response");
            return false;
        }
        self.loading = false;
        match result {
            Ok(result) => self.result = Some(result),
            Err(e) => self.error = Some(e.to_string()),
        }
        true
    }

    /// Run the current query. Returns false when nothing was sent.
    pub async fn submit<A: LedgerApi + ?Sized>(&mut self, api: &A) -> bool {
        let Some((ticket, request)) = self.begin_search() else {
            return false;
        };
        let result = api.search(&request).await;
        self.finish_search(ticket, result);
        true
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn result(&self) -> Option<&SearchResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Nothing searched yet and nothing failed.
    pub fn is_idle(&self) -> bool {
        self.result.is_none() && self.error.is_none() && !self.loading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::model::SearchDecision;
    use crate::testing::MemoryApi;

    fn result_with(count: usize) -> SearchResult {
        SearchResult {
            answer: "Billing moved to Stripe in March.".to_string(),
            decisions: (0..count)
                .map(|i| SearchDecision {
                    id: format!("s{}", i),
                    title: format!("Result {}", i),
                    summary: None,
                    rationale: None,
                    owner_name: None,
                    tags: None,
                    source_url: None,
                    created_at: Some("2024-03-01T00:00:00Z".to_string()),
                    combined_score: 0.8,
                })
                .collect(),
            total_count: count as u64,
            response_time_ms: 40,
        }
    }

    #[tokio::test]
    async fn test_blank_query_sends_nothing() {
        let api = MemoryApi::new();
        let mut view = SearchView::default();
        view.set_query("   ");
        assert!(!view.can_submit());
        assert!(!view.submit(&api).await);
        assert_eq!(api.request_count(), 0);
        assert!(view.is_idle());
    }

    #[tokio::test]
    async fn test_submit_renders_answer() {
        let api = MemoryApi::new().with_search_result(result_with(2));
        let mut view = SearchView::default();
        view.set_query("  who owns billing? ");
        assert!(view.submit(&api).await);

        let result = view.result().unwrap();
        assert_eq!(result.answer, "Billing moved to Stripe in March.");
        assert_eq!(result.decisions.len(), 2);
        assert!(!view.is_loading());
        assert!(!view.is_idle());
    }

    #[test]
    fn test_no_resubmit_while_loading() {
        let mut view = SearchView::default();
        view.set_query("why kafka");
        let first = view.begin_search();
        assert!(first.is_some());
        assert!(view.is_loading());
        assert!(!view.can_submit());
        assert!(view.begin_search().is_none());
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_result() {
        let api = MemoryApi::new().with_search_result(result_with(1));
        let mut view = SearchView::default();
        view.set_query("first");
        view.submit(&api).await;

        api.fail("POST /api/search", 503, "search unavailable");
        view.set_query("second");
        view.submit(&api).await;

        assert_eq!(view.error(), Some("503: search unavailable"));
        assert_eq!(view.result().map(|r| r.decisions.len()), Some(1));
    }

    #[test]
    fn test_limit_is_carried_into_request() {
        let mut view = SearchView::new(3);
        view.set_query("q");
        let (_, request) = view.begin_search().unwrap();
        assert_eq!(request.limit, 3);
        assert_eq!(request.offset, 0);
    }
}
