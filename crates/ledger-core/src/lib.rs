//! Decision Ledger Core Library
//!
//! API client, wire models and view state for the Decision Ledger dashboard.

pub mod analytics;
pub mod api;
pub mod client;
pub mod config;
pub mod decision;
pub mod error;
pub mod pagination;
pub mod search;
pub mod view;
pub mod workspace;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use api::LedgerApi;
pub use client::HttpClient;
pub use config::Config;
pub use error::{LedgerError, LedgerResult};
