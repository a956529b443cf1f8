//! A single payload holding the listing and every report view for a month.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    config::ReportingConfig,
    db::run_query,
    pagination::PaginationConfig,
    transaction::{DateFilter, ListingQuery, ListingState, Transaction, list_transactions},
};

use super::{
    MonthQuery,
    categories::{CategoryCount, compute_category_counts},
    histogram::{BucketCount, compute_histogram},
    statistics::{Statistics, compute_statistics},
};

/// The state needed for the combined report.
#[derive(Debug, Clone)]
pub struct CombinedState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// Controls the page size of the listing.
    pub pagination_config: PaginationConfig,
    /// Determines the year that month names refer to.
    pub reporting_config: ReportingConfig,
}

impl FromRef<AppState> for CombinedState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
            reporting_config: state.reporting_config.clone(),
        }
    }
}

/// The listing page plus all three report views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedReport {
    /// The first page of transactions, without search.
    pub transactions: Vec<Transaction>,
    /// Sales totals for the month.
    pub statistics: Statistics,
    /// The price histogram for the month.
    pub bar_chart: Vec<BucketCount>,
    /// The category breakdown for the month.
    pub pie_chart: Vec<CategoryCount>,
}

/// Build every view for `month` concurrently, listing the first page.
///
/// # Errors
/// Returns the first error from any view; no partial report is produced.
pub async fn build_combined_report(
    state: &CombinedState,
    month: Option<&str>,
) -> Result<CombinedReport, Error> {
    build_month_report(state, month, &ListingQuery::for_month(month)).await
}

/// Build every view for `month` concurrently, with the listing page and
/// search taken from `listing_query`.
///
/// # Errors
/// Returns the first error from any view; no partial report is produced.
pub async fn build_month_report(
    state: &CombinedState,
    month: Option<&str>,
    listing_query: &ListingQuery,
) -> Result<CombinedReport, Error> {
    let date = DateFilter::for_month(month, state.reporting_config.reference_year);
    let listing_state = ListingState {
        db_connection: state.db_connection.clone(),
        pagination_config: state.pagination_config.clone(),
        reporting_config: state.reporting_config.clone(),
    };

    let (transactions, statistics, bar_chart, pie_chart) = tokio::try_join!(
        list_transactions(&listing_state, listing_query),
        run_query(state.db_connection.clone(), move |connection| {
            compute_statistics(date, connection)
        }),
        run_query(state.db_connection.clone(), move |connection| {
            compute_histogram(date, connection)
        }),
        run_query(state.db_connection.clone(), move |connection| {
            compute_category_counts(date, connection)
        }),
    )?;

    Ok(CombinedReport {
        transactions,
        statistics,
        bar_chart,
        pie_chart,
    })
}

/// Route handler for the combined report of a month.
pub async fn get_combined_endpoint(
    State(state): State<CombinedState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<CombinedReport>, Error> {
    let report = build_combined_report(&state, query.month.as_deref())
        .await
        .inspect_err(|error| tracing::error!("could not build combined report: {error}"))?;

    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, http::StatusCode, routing::get};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use time::{Duration, macros::datetime};

    use crate::{
        config::ReportingConfig,
        endpoints,
        pagination::PaginationConfig,
        report::{Statistics, test_utils::get_test_connection},
        transaction::Transaction,
    };

    use crate::transaction::ListingQuery;

    use super::{
        CombinedReport, CombinedState, build_combined_report, build_month_report,
        get_combined_endpoint,
    };

    fn get_test_state(transactions: &[Transaction]) -> CombinedState {
        CombinedState {
            db_connection: Arc::new(Mutex::new(get_test_connection(transactions))),
            pagination_config: PaginationConfig::default(),
            reporting_config: ReportingConfig::default(),
        }
    }

    fn sample_transactions() -> Vec<Transaction> {
        let mut transactions = vec![
            Transaction::build("march-sold", 150.0, datetime!(2022-03-05 10:00 UTC))
                .category("electronics")
                .sold(true)
                .finalise(),
            Transaction::build("march-unsold", 150.0, datetime!(2022-03-06 10:00 UTC))
                .category("electronics")
                .finalise(),
        ];

        transactions.extend((0..12).map(|i| {
            Transaction::build(
                &format!("june-{i}"),
                950.0,
                datetime!(2022-06-01 10:00 UTC) + Duration::days(i),
            )
            .category("jewelery")
            .finalise()
        }));

        transactions
    }

    #[tokio::test]
    async fn merges_all_views() {
        let transactions = sample_transactions();
        let state = get_test_state(&transactions);

        let report = build_combined_report(&state, Some("March")).await.unwrap();

        // The listing ignores the month, so it starts with the first records.
        assert_eq!(report.transactions, transactions[..10]);
        assert_eq!(
            report.statistics,
            Statistics {
                total_sale_amount: 300.0,
                total_sold_items: 2,
                total_not_sold_items: 1,
            }
        );
        assert_eq!(report.bar_chart.len(), 10);
        assert_eq!(report.bar_chart[1].count, 2);
        assert_eq!(report.bar_chart[9].count, 0);
        assert_eq!(report.pie_chart.len(), 1);
        assert_eq!(report.pie_chart[0].category, "electronics");
    }

    #[tokio::test]
    async fn listing_uses_month_when_enabled() {
        let transactions = sample_transactions();
        let mut state = get_test_state(&transactions);
        state.reporting_config.listing_month_filter = true;

        let report = build_combined_report(&state, Some("June")).await.unwrap();

        assert_eq!(report.transactions, transactions[2..12]);
        assert_eq!(report.statistics.total_sold_items, 12);
    }

    #[tokio::test]
    async fn month_report_pages_and_searches_the_listing() {
        let transactions = sample_transactions();
        let state = get_test_state(&transactions);
        let listing_query = ListingQuery {
            search: Some("950".to_owned()),
            page: Some("2".to_owned()),
            per_page: Some("5".to_owned()),
            month: Some("March".to_owned()),
        };

        let report = build_month_report(&state, Some("March"), &listing_query)
            .await
            .unwrap();

        assert_eq!(report.transactions, transactions[7..12]);
        assert_eq!(report.statistics.total_sale_amount, 300.0);
        assert_eq!(report.pie_chart[0].category, "electronics");
    }

    #[tokio::test]
    async fn fails_as_a_whole_when_a_view_fails() {
        // Without the transaction table every query fails.
        let state = CombinedState {
            db_connection: Arc::new(Mutex::new(Connection::open_in_memory().unwrap())),
            pagination_config: PaginationConfig::default(),
            reporting_config: ReportingConfig::default(),
        };

        let result = build_combined_report(&state, Some("March")).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn endpoint_returns_camel_case_fields() {
        let app = Router::new()
            .route(endpoints::COMBINED, get(get_combined_endpoint))
            .with_state(get_test_state(&sample_transactions()));
        let server = TestServer::new(app);

        let response = server
            .get(endpoints::COMBINED)
            .add_query_param("month", "June")
            .await;

        response.assert_status_ok();
        let json: serde_json::Value = response.json();
        for field in ["transactions", "statistics", "barChart", "pieChart"] {
            assert!(json.get(field).is_some(), "missing field {field}");
        }
        let report: CombinedReport = response.json();
        assert_eq!(report.statistics.total_sale_amount, 950.0 * 12.0);
    }

    #[tokio::test]
    async fn endpoint_reports_failure_as_json_error() {
        let state = CombinedState {
            db_connection: Arc::new(Mutex::new(Connection::open_in_memory().unwrap())),
            pagination_config: PaginationConfig::default(),
            reporting_config: ReportingConfig::default(),
        };
        let app = Router::new()
            .route(endpoints::COMBINED, get(get_combined_endpoint))
            .with_state(state);
        let server = TestServer::new(app);

        let response = server
            .get(endpoints::COMBINED)
            .add_query_param("month", "March")
            .expect_failure()
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let json: serde_json::Value = response.json();
        assert!(json["error"].is_string());
    }
}
