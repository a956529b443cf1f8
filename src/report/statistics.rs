//! Sales totals for a month.

use axum::{
    Json,
    extract::{Query, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    db::run_query,
    transaction::{DateFilter, TransactionFilter, count_transactions, sum_prices},
};

use super::{MonthQuery, ReportState};

/// Summary numbers for the records sold in a month.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// The sum of the price of every record in the month, sold or not.
    pub total_sale_amount: f64,
    /// The number of records in the month, sold or not.
    pub total_sold_items: u64,
    /// The number of records in the month that were not sold.
    pub total_not_sold_items: u64,
}

/// Compute the statistics for records within `date`.
///
/// # Errors
/// Returns [Error::SqlError] if a query fails.
pub fn compute_statistics(date: DateFilter, connection: &Connection) -> Result<Statistics, Error> {
    let window = TransactionFilter::for_dates(date);

    let totals = sum_prices(&window, connection)?;
    let total_not_sold_items = count_transactions(&window.sold(false), connection)?;

    Ok(Statistics {
        total_sale_amount: totals.total_price,
        total_sold_items: totals.count,
        total_not_sold_items,
    })
}

/// Route handler for the statistics of a month.
pub async fn get_statistics_endpoint(
    State(state): State<ReportState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Statistics>, Error> {
    let date = state.date_filter(&query);

    let statistics = run_query(state.db_connection, move |connection| {
        compute_statistics(date, connection)
    })
    .await
    .inspect_err(|error| tracing::error!("could not compute statistics: {error}"))?;

    Ok(Json(statistics))
}
