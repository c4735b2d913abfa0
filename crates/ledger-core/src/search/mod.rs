//! Natural-language search over decisions.

pub mod model;

use model::SearchRequest;

/// Path of the search endpoint.
pub const SEARCH_PATH: &str = "/api/search";

/// Prompt shown before any search was run.
pub const IDLE_PROMPT: &str = "Ask a question about your team's decisions";

/// Build a request from raw user input.
///
/// Returns `None` for blank input; the query is trimmed otherwise.
pub fn build_request(raw_query: &str, limit: u32) -> Option<SearchRequest> {
    let query = raw_query.trim();
    if query.is_empty() {
        return None;
    }
    Some(SearchRequest {
        query: query.to_string(),
        limit,
        offset: 0,
        filters: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_query_builds_nothing() {
        assert!(build_request("", 5).is_none());
        assert!(build_request(" \t\n", 5).is_none());
    }

    #[test]
    fn test_query_is_trimmed() {
        let req = build_request("  who owns billing?  ", 5).unwrap();
        assert_eq!(req.query, "who owns billing?");
        assert_eq!(req.limit, 5);
    }
}
