//! Counts of the records in a month grouped into fixed price ranges.

use axum::{
    Json,
    extract::{Query, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    db::run_query,
    transaction::{DateFilter, PriceRange, TransactionFilter, count_transactions},
};

use super::{MonthQuery, ReportState};

/// The upper bound of the open-ended top bucket.
pub const PRICE_CEILING: f64 = 1e9;

/// A labelled price range used by the histogram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBucket {
    /// The label shown for the bucket, e.g. "101-200".
    pub label: &'static str,
    /// The prices counted in the bucket.
    pub range: PriceRange,
}

const fn bucket(label: &'static str, min: f64, max: f64) -> PriceBucket {
    PriceBucket {
        label,
        range: PriceRange { min, max },
    }
}

/// The histogram buckets in display order.
///
/// Buckets after the first start one above the previous bucket's upper bound,
/// so prices in `[100, 101)`, `[200, 201)` and so on fall in no bucket.
pub const PRICE_BUCKETS: [PriceBucket; 10] = [
    bucket("0-100", 0.0, 100.0),
    bucket("101-200", 101.0, 200.0),
    bucket("201-300", 201.0, 300.0),
    bucket("301-400", 301.0, 400.0),
    bucket("401-500", 401.0, 500.0),
    bucket("501-600", 501.0, 600.0),
    bucket("601-700", 601.0, 700.0),
    bucket("701-800", 701.0, 800.0),
    bucket("801-900", 801.0, 900.0),
    bucket("901-above", 901.0, PRICE_CEILING),
];

/// The number of records in one price bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketCount {
    /// The bucket label.
    pub range: String,
    /// The number of records whose price is in the bucket.
    pub count: u64,
}

/// Count the records within `date` in each of the [PRICE_BUCKETS].
///
/// Always returns one entry per bucket, in bucket order.
///
/// # Errors
/// Returns [Error::SqlError] if a query fails.
pub fn compute_histogram(date: DateFilter, connection: &Connection) -> Result<Vec<BucketCount>, Error> {
    PRICE_BUCKETS
        .iter()
        .map(|bucket| {
            let filter = TransactionFilter::for_dates(date).price(bucket.range);

            Ok(BucketCount {
                range: bucket.label.to_owned(),
                count: count_transactions(&filter, connection)?,
            })
        })
        .collect()
}

/// Route handler for the price histogram of a month.
pub async fn get_bar_chart_endpoint(
    State(state): State<ReportState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Vec<BucketCount>>, Error> {
    let date = state.date_filter(&query);

    let histogram = run_query(state.db_connection, move |connection| {
        compute_histogram(date, connection)
    })
    .await
    .inspect_err(|error| tracing::error!("could not compute price histogram: {error}"))?;

    Ok(Json(histogram))
}
