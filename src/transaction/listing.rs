//! Defines the route handler that lists transactions a page at a time.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    config::ReportingConfig,
    db::run_query,
    pagination::{Page, PaginationConfig},
};

use super::{
    core::Transaction, filter::TransactionFilter, month::DateFilter, store::find_transactions,
};

/// The state needed for listing transactions.
#[derive(Debug, Clone)]
pub struct ListingState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// Controls default and maximum page sizes.
    pub pagination_config: PaginationConfig,
    /// Controls whether the listing honours `month`.
    pub reporting_config: ReportingConfig,
}

impl FromRef<AppState> for ListingState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
            reporting_config: state.reporting_config.clone(),
        }
    }
}

/// The query parameters accepted by the listing.
///
/// Paging values are kept as text so that malformed numbers fall back to the
/// defaults instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingQuery {
    /// Free text matched against title, description and price.
    pub search: Option<String>,
    /// The 1-based page number.
    pub page: Option<String>,
    /// The number of records per page.
    pub per_page: Option<String>,
    /// A month name, only used when the listing month filter is enabled.
    pub month: Option<String>,
}

impl ListingQuery {
    /// A query for the first page of all records, optionally for `month`.
    pub fn for_month(month: Option<&str>) -> Self {
        Self {
            month: month.map(str::to_owned),
            ..Default::default()
        }
    }

    /// Build the filter and page for this query.
    ///
    /// A blank or missing `month` does not restrict dates, even with the month
    /// filter enabled. An unrecognised month matches nothing.
    pub fn to_filter_and_page(
        &self,
        reporting_config: &ReportingConfig,
        pagination_config: &PaginationConfig,
    ) -> (TransactionFilter, Page) {
        let date = match self.month.as_deref().map(str::trim) {
            Some(month) if reporting_config.listing_month_filter && !month.is_empty() => {
                DateFilter::for_month(Some(month), reporting_config.reference_year)
            }
            _ => DateFilter::Any,
        };

        let filter =
            TransactionFilter::for_dates(date).search(self.search.as_deref().unwrap_or_default());
        let page = Page::from_params(
            self.page.as_deref(),
            self.per_page.as_deref(),
            pagination_config,
        );

        (filter, page)
    }
}

/// Get one page of the transactions matching the query.
pub async fn list_transactions(
    state: &ListingState,
    query: &ListingQuery,
) -> Result<Vec<Transaction>, Error> {
    let (filter, page) = query.to_filter_and_page(&state.reporting_config, &state.pagination_config);

    run_query(state.db_connection.clone(), move |connection| {
        find_transactions(&filter, page, connection)
    })
    .await
}

/// Route handler for listing transactions as JSON.
pub async fn get_transactions_endpoint(
    State(state): State<ListingState>,
    Query(query): Query<ListingQuery>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let transactions = list_transactions(&state, &query)
        .await
        .inspect_err(|error| tracing::error!("could not list transactions: {error}"))?;

    Ok(Json(transactions))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, routing::get};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use time::{Duration, macros::datetime};

    use crate::{
        config::ReportingConfig,
        db::initialize,
        endpoints,
        pagination::PaginationConfig,
        transaction::{Transaction, replace_all_transactions},
    };

    use super::{ListingQuery, ListingState, get_transactions_endpoint};

    fn get_test_state(transactions: &[Transaction], listing_month_filter: bool) -> ListingState {
        let mut conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        replace_all_transactions(transactions, &mut conn).unwrap();

        ListingState {
            db_connection: Arc::new(Mutex::new(conn)),
            pagination_config: PaginationConfig::default(),
            reporting_config: ReportingConfig {
                listing_month_filter,
                ..Default::default()
            },
        }
    }

    fn transactions_over_two_months() -> Vec<Transaction> {
        (0..30)
            .map(|i| {
                Transaction::build(
                    &i.to_string(),
                    10.0 * i as f64,
                    datetime!(2022-03-20 12:00 UTC) + Duration::days(i),
                )
                .title(&format!("item {i}"))
                .finalise()
            })
            .collect()
    }

    fn server(state: ListingState) -> TestServer {
        let app = Router::new()
            .route(endpoints::TRANSACTIONS, get(get_transactions_endpoint))
            .with_state(state);

        TestServer::new(app)
    }

    #[tokio::test]
    async fn returns_first_page_by_default() {
        let transactions = transactions_over_two_months();
        let server = server(get_test_state(&transactions, false));

        let response = server.get(endpoints::TRANSACTIONS).await;

        response.assert_status_ok();
        let got: Vec<Transaction> = response.json();
        assert_eq!(got, transactions[..10]);
    }

    #[tokio::test]
    async fn returns_requested_page() {
        let transactions = transactions_over_two_months();
        let server = server(get_test_state(&transactions, false));

        let got: Vec<Transaction> = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("page", 2)
            .add_query_param("perPage", 10)
            .await
            .json();

        assert_eq!(got, transactions[10..20]);
    }

    #[tokio::test]
    async fn page_past_end_is_empty() {
        let server = server(get_test_state(&transactions_over_two_months(), false));

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("page", 9)
            .await;

        response.assert_status_ok();
        let got: Vec<Transaction> = response.json();
        assert!(got.is_empty());
    }

    #[tokio::test]
    async fn malformed_paging_uses_defaults() {
        let transactions = transactions_over_two_months();
        let server = server(get_test_state(&transactions, false));

        let got: Vec<Transaction> = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("page", "abc")
            .add_query_param("perPage", "-3")
            .await
            .json();

        assert_eq!(got, transactions[..10]);
    }

    #[tokio::test]
    async fn numeric_search_matches_price_and_text() {
        let transactions = transactions_over_two_months();
        let server = server(get_test_state(&transactions, false));

        let got: Vec<Transaction> = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("search", "20")
            .await
            .json();

        // "item 20" by title and item 2 by its price of 20.
        let ids: Vec<_> = got.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["2", "20"]);
    }

    #[tokio::test]
    async fn month_is_ignored_by_default() {
        let transactions = transactions_over_two_months();
        let server = server(get_test_state(&transactions, false));

        let got: Vec<Transaction> = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("month", "April")
            .await
            .json();

        assert_eq!(got, transactions[..10]);
    }

    #[tokio::test]
    async fn month_filters_when_enabled() {
        let transactions = transactions_over_two_months();
        let server = server(get_test_state(&transactions, true));

        let got: Vec<Transaction> = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("month", "April")
            .await
            .json();

        // March 20 + 12 days is the first April record.
        assert_eq!(got, transactions[12..22]);
    }

    #[test]
    fn blank_month_does_not_filter_when_enabled() {
        let reporting_config = ReportingConfig {
            listing_month_filter: true,
            ..Default::default()
        };
        let query = ListingQuery::for_month(Some(" "));

        let (filter, _) = query.to_filter_and_page(&reporting_config, &PaginationConfig::default());

        assert_eq!(filter.date, crate::transaction::DateFilter::Any);
    }
}
