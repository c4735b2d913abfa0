//! Route handlers.

pub mod decisions;
pub mod landing;
pub mod overview;
pub mod search;
pub mod settings;

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use ledger_core::LedgerError;

/// Render a template, mapping template failures to a 500 page.
pub(crate) fn render<T: Template>(status: StatusCode, template: &T) -> Response {
    match template.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(format!("Template error: {}", e)),
        )
            .into_response(),
    }
}

/// Status of a page re-rendered after a failed API call.
pub(crate) fn error_status(err: &LedgerError) -> StatusCode {
    match err {
        LedgerError::ValidationError(_) => StatusCode::BAD_REQUEST,
        _ => upstream_status(err.status()),
    }
}

/// Client errors from the API are passed through; anything else is a 502.
pub(crate) fn upstream_status(status: Option<u16>) -> StatusCode {
    status
        .and_then(|s| StatusCode::from_u16(s).ok())
        .filter(StatusCode::is_client_error)
        .unwrap_or(StatusCode::BAD_GATEWAY)
}

/// Date part of an ISO timestamp, or the raw value when it does not parse.
pub(crate) fn display_date(raw: &str) -> String {
    ledger_core::decision::model::parse_date(raw)
        .map(|d| d.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use ledger_core::testing::MemoryApi;
    use ledger_core::Config;
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::{create_router, state::AppState};

    pub fn router(api: Arc<MemoryApi>) -> Router {
        create_router(AppState::new(api, Config::default()))
    }

    /// Send a request and return the status, `Location` header and body.
    pub async fn send(router: Router, request: Request<Body>) -> (StatusCode, Option<String>, String) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let location = response
            .headers()
            .get("location")
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, location, String::from_utf8(bytes.to_vec()).unwrap())
    }

    pub fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    pub fn post_form(uri: &str, form: &str) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap()
    }
}
