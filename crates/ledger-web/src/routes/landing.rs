//! Landing page.

use askama::Template;
use axum::{extract::State, http::StatusCode, response::Response};

use super::render;
use crate::state::AppState;

#[derive(Template)]
#[template(path = "landing.html")]
struct LandingTemplate {
    auth_url: String,
}

/// GET / - Landing page with the Slack sign-in link.
pub async fn index(State(state): State<AppState>) -> Response {
    let template = LandingTemplate {
        auth_url: state.config.slack_auth_url(),
    };
    render(StatusCode::OK, &template)
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::{get, router, send};
    use axum::http::StatusCode;
    use ledger_core::testing::MemoryApi;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_landing_links_to_slack_auth_without_fetching() {
        let api = Arc::new(MemoryApi::new());
        let (status, _, body) = send(router(api.clone()), get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#"href="http://localhost:8000/auth/slack""#));
        assert!(body.contains("Connect to Slack"));
        assert_eq!(api.request_count(), 0);
    }
}
