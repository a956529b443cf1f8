//! Report views over the transactions sold in one month.
//!
//! Each view is built from a filter holding only the month window; search text
//! never applies to reports.

mod categories;
mod combined;
mod histogram;
mod statistics;

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{AppState, config::ReportingConfig, transaction::DateFilter};

pub use categories::{CategoryCount, get_pie_chart_endpoint};
pub use combined::{CombinedReport, CombinedState, build_month_report, get_combined_endpoint};
pub use histogram::{BucketCount, get_bar_chart_endpoint};
pub use statistics::{Statistics, get_statistics_endpoint};

/// The state needed for the report endpoints.
#[derive(Debug, Clone)]
pub struct ReportState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// Determines the year that month names refer to.
    pub reporting_config: ReportingConfig,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            reporting_config: state.reporting_config.clone(),
        }
    }
}

impl ReportState {
    fn date_filter(&self, query: &MonthQuery) -> DateFilter {
        DateFilter::for_month(
            query.month.as_deref(),
            self.reporting_config.reference_year,
        )
    }
}

/// The query parameters accepted by the report endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonthQuery {
    /// A month name such as "March".
    pub month: Option<String>,
}
