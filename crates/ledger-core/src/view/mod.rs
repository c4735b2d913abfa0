//! View state for the dashboard pages.
//!
//! Views own their state, take `&mut self` to change it and borrow any
//! [`LedgerApi`](crate::api::LedgerApi) to fetch.

pub mod decisions;
pub mod notice;
pub mod overview;
pub mod search;
pub mod sequence;
pub mod settings;

pub use decisions::DecisionListView;
pub use notice::Notice;
pub use overview::OverviewView;
pub use search::SearchView;
pub use sequence::{RequestSequencer, Ticket};
pub use settings::SettingsView;
