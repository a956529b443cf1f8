//! The number of records per category in a month.

use axum::{
    Json,
    extract::{Query, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    db::run_query,
    transaction::{DateFilter, GroupField, TransactionFilter, count_by},
};

use super::{MonthQuery, ReportState};

/// The number of records in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    /// The category name.
    pub category: String,
    /// The number of records in the category.
    pub count: u64,
}

/// Count the records within `date` per category, sorted by category name.
///
/// Only categories with at least one record in the window are included.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn compute_category_counts(
    date: DateFilter,
    connection: &Connection,
) -> Result<Vec<CategoryCount>, Error> {
    let groups = count_by(
        &TransactionFilter::for_dates(date),
        GroupField::Category,
        connection,
    )?;

    Ok(groups
        .into_iter()
        .map(|(category, count)| CategoryCount { category, count })
        .collect())
}

/// Route handler for the category breakdown of a month.
pub async fn get_pie_chart_endpoint(
    State(state): State<ReportState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Vec<CategoryCount>>, Error> {
    let date = state.date_filter(&query);

    let categories = run_query(state.db_connection, move |connection| {
        compute_category_counts(date, connection)
    })
    .await
    .inspect_err(|error| tracing::error!("could not count categories: {error}"))?;

    Ok(Json(categories))
}

#[cfg(test)]
mod tests {
    use axum::{Router, routing::get};
    use axum_test::TestServer;
    use time::macros::datetime;

    use crate::{
        endpoints,
        report::test_utils::{get_test_connection, get_test_state},
        transaction::{DateFilter, Transaction},
    };

    use super::{CategoryCount, compute_category_counts, get_pie_chart_endpoint};

    fn march() -> DateFilter {
        DateFilter::for_month(Some("March"), 2022)
    }

    fn in_category(id: &str, category: &str, date: time::OffsetDateTime) -> Transaction {
        Transaction::build(id, 10.0, date).category(category).finalise()
    }

    #[test]
    fn groups_window_records_by_category() {
        let march_day = datetime!(2022-03-15 12:00 UTC);
        let conn = get_test_connection(&[
            in_category("1", "men's clothing", march_day),
            in_category("2", "electronics", march_day),
            in_category("3", "men's clothing", march_day),
            in_category("4", "jewelery", datetime!(2022-04-15 12:00 UTC)),
        ]);

        let categories = compute_category_counts(march(), &conn).unwrap();

        assert_eq!(
            categories,
            vec![
                CategoryCount {
                    category: "electronics".to_owned(),
                    count: 1
                },
                CategoryCount {
                    category: "men's clothing".to_owned(),
                    count: 2
                },
            ]
        );
        let total: u64 = categories.iter().map(|category| category.count).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn empty_window_has_no_categories() {
        let conn = get_test_connection(&[in_category(
            "1",
            "electronics",
            datetime!(2022-05-15 12:00 UTC),
        )]);

        let categories = compute_category_counts(march(), &conn).unwrap();

        assert!(categories.is_empty());
    }

    #[tokio::test]
    async fn endpoint_returns_category_counts() {
        let state = get_test_state(&[
            in_category("1", "electronics", datetime!(2022-03-15 12:00 UTC)),
            in_category("2", "electronics", datetime!(2022-03-16 12:00 UTC)),
        ]);
        let app = Router::new()
            .route(endpoints::PIE_CHART, get(get_pie_chart_endpoint))
            .with_state(state);
        let server = TestServer::new(app);

        let response = server
            .get(endpoints::PIE_CHART)
            .add_query_param("month", "mar")
            .await;

        response.assert_status_ok();
        response.assert_json(&serde_json::json!([
            { "category": "electronics", "count": 2 }
        ]));
    }
}
