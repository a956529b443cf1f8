//! Dashboard module
//!
//! Provides a page showing the transactions of a month alongside its sales
//! statistics and charts.

mod charts;
mod handlers;
mod tables;

pub use handlers::get_dashboard_page;
