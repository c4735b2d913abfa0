//! Decision Ledger Web Dashboard
//!
//! Axum server rendering the dashboard pages over the ledger API.

pub mod nav;
pub mod routes;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use ledger_core::{Config, LedgerApi};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let dashboard_routes = Router::new()
        // Decisions
        .route("/decisions", get(routes::decisions::list))
        .route("/decisions/{id}/{action}", post(routes::decisions::act))
        // Search
        .route("/search", get(routes::search::search))
        // Settings
        .route("/settings", get(routes::settings::show))
        .route("/settings/channels", post(routes::settings::add_channel))
        .route(
            "/settings/channels/{channel_id}/remove",
            post(routes::settings::remove_channel),
        )
        .route("/settings/jira", post(routes::settings::connect_jira))
        .route("/settings/github", post(routes::settings::connect_github))
        .route("/settings/backfill", post(routes::settings::trigger_backfill))
        .with_state(state.clone());

    Router::new()
        .route("/", get(routes::landing::index))
        .route("/dashboard", get(routes::overview::index))
        .nest("/dashboard", dashboard_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the web server.
pub async fn run_server(
    api: Arc<dyn LedgerApi>,
    config: Config,
    host: &str,
    port: u16,
) -> anyhow::Result<()> {
    let api_url = config.base_url().to_string();
    let state = AppState::new(api, config);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;
    tracing::info!(api_url = %api_url, "Dashboard listening on http://{}:{}", host, port);

    axum::serve(listener, app).await?;
    Ok(())
}
