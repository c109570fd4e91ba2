//! Dashboard module
//!
//! Summarises the user's income and expenses for the dashboard.

mod aggregation;
mod handlers;

pub use handlers::get_dashboard_endpoint;
