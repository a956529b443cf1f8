//! Database queries over the transaction table.
//!
//! Every read takes a [TransactionFilter] and never modifies stored data.
//! [replace_all_transactions] is the only write and is used by the seed loader.

use rusqlite::{
    Connection, Row, params_from_iter,
    types::{Type, Value},
};

use crate::{Error, pagination::Page};

use super::{
    core::{TRANSACTION_COLUMNS, Transaction, map_transaction_row, to_stored_timestamp},
    filter::TransactionFilter,
};

/// The sum of prices and number of records matched by a filter.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PriceTotals {
    /// The sum of the price of all matching records.
    pub total_price: f64,
    /// The number of matching records.
    pub count: u64,
}

/// A column that records can be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupField {
    /// The product category.
    Category,
}

impl GroupField {
    fn column(self) -> &'static str {
        match self {
            Self::Category => "category",
        }
    }
}

/// Get one page of the transactions that match `filter`, in store order.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails or a row cannot be mapped.
pub fn find_transactions(
    filter: &TransactionFilter,
    page: Page,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let sql = filter.to_sql();
    let query = format!(
        "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE {} ORDER BY rowid ASC LIMIT ? OFFSET ?",
        sql.clause
    );

    let mut params = sql.params;
    params.push(Value::Integer(to_sql_integer(page.limit())));
    params.push(Value::Integer(to_sql_integer(page.offset())));

    connection
        .prepare(&query)?
        .query_map(params_from_iter(params), map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::SqlError))
        .collect()
}

/// Count the transactions that match `filter`, ignoring paging.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn count_transactions(filter: &TransactionFilter, connection: &Connection) -> Result<u64, Error> {
    let sql = filter.to_sql();
    let query = format!(
        "SELECT COUNT(*) FROM \"transaction\" WHERE {}",
        sql.clause
    );

    connection
        .query_row(&query, params_from_iter(sql.params), |row| get_count(row, 0))
        .map_err(|error| error.into())
}

/// Sum the prices of, and count, the transactions that match `filter`.
///
/// Returns zeros when nothing matches.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn sum_prices(filter: &TransactionFilter, connection: &Connection) -> Result<PriceTotals, Error> {
    let sql = filter.to_sql();
    let query = format!(
        "SELECT COALESCE(SUM(price), 0.0), COUNT(*) FROM \"transaction\" WHERE {}",
        sql.clause
    );

    connection
        .query_row(&query, params_from_iter(sql.params), |row| {
            Ok(PriceTotals {
                total_price: row.get(0)?,
                count: get_count(row, 1)?,
            })
        })
        .map_err(|error| error.into())
}

/// Count the transactions that match `filter` for each distinct value of
/// `field`, sorted by value.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn count_by(
    filter: &TransactionFilter,
    field: GroupField,
    connection: &Connection,
) -> Result<Vec<(String, u64)>, Error> {
    let sql = filter.to_sql();
    let column = field.column();
    let query = format!(
        "SELECT {column}, COUNT(*) FROM \"transaction\" WHERE {} GROUP BY {column} ORDER BY {column} ASC",
        sql.clause
    );

    connection
        .prepare(&query)?
        .query_map(params_from_iter(sql.params), |row| {
            Ok((row.get(0)?, get_count(row, 1)?))
        })?
        .map(|group_result| group_result.map_err(Error::SqlError))
        .collect()
}

/// Replace every stored transaction with `transactions`.
///
/// The delete and the inserts run in one SQL transaction, so readers see
/// either the old set or the new set.
///
/// # Errors
/// Returns [Error::SqlError] if any statement fails, in which case the
/// previous records are kept.
pub fn replace_all_transactions(
    transactions: &[Transaction],
    connection: &mut Connection,
) -> Result<usize, Error> {
    let sql_transaction = connection.transaction()?;

    sql_transaction.execute("DELETE FROM \"transaction\"", ())?;

    {
        let mut statement = sql_transaction.prepare(
            "INSERT INTO \"transaction\" (id, title, description, price, date_of_sale, category, sold)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;

        for transaction in transactions {
            statement.execute((
                &transaction.id,
                &transaction.title,
                &transaction.description,
                transaction.price,
                to_stored_timestamp(transaction.date_of_sale)?,
                &transaction.category,
                transaction.sold,
            ))?;
        }
    }

    sql_transaction.commit()?;

    Ok(transactions.len())
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn count_all_transactions(connection: &Connection) -> Result<u64, Error> {
    count_transactions(&TransactionFilter::default(), connection)
}

/// Read a `COUNT(*)` style column, which SQLite returns as a signed integer.
fn get_count(row: &Row, index: usize) -> Result<u64, rusqlite::Error> {
    let count: i64 = row.get(index)?;

    u64::try_from(count).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(index, Type::Integer, Box::new(error))
    })
}

fn to_sql_integer(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
