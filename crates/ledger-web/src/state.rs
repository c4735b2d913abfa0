//! Application state.

use ledger_core::{Config, LedgerApi};
use std::sync::Arc;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn LedgerApi>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(api: Arc<dyn LedgerApi>, config: Config) -> Self {
        Self {
            api,
            config: Arc::new(config),
        }
    }
}
