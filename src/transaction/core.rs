//! Defines the transaction record and the table that stores it.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;

// ============================================================================
// MODELS
// ============================================================================

/// A product sale record from the seeded dataset.
///
/// To create a new `Transaction` in code, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The identifier assigned by the seed source.
    ///
    /// The seed source sends numbers, but any string is accepted.
    #[serde(deserialize_with = "deserialize_record_id")]
    pub id: String,
    /// The product name.
    pub title: String,
    /// A longer text description of the product.
    pub description: String,
    /// The sale price, never negative.
    pub price: f64,
    /// When the product was sold (or listed for sale).
    #[serde(with = "time::serde::rfc3339")]
    pub date_of_sale: OffsetDateTime,
    /// The product category, e.g. "electronics".
    pub category: String,
    /// Whether the product has been sold.
    pub sold: bool,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(id: &str, price: f64, date_of_sale: OffsetDateTime) -> TransactionBuilder {
        TransactionBuilder {
            id: id.to_owned(),
            title: String::new(),
            description: String::new(),
            price,
            date_of_sale,
            category: String::new(),
            sold: false,
        }
    }
}

/// A builder for creating [Transaction] instances with sensible defaults.
///
/// Text fields default to the empty string and `sold` defaults to `false`.
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    id: String,
    title: String,
    description: String,
    price: f64,
    date_of_sale: OffsetDateTime,
    category: String,
    sold: bool,
}

impl TransactionBuilder {
    /// Set the product name.
    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_owned();
        self
    }

    /// Set the product description.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Set the product category.
    pub fn category(mut self, category: &str) -> Self {
        self.category = category.to_owned();
        self
    }

    /// Set whether the product was sold.
    pub fn sold(mut self, sold: bool) -> Self {
        self.sold = sold;
        self
    }

    /// Create the [Transaction].
    pub fn finalise(self) -> Transaction {
        Transaction {
            id: self.id,
            title: self.title,
            description: self.description,
            price: self.price,
            date_of_sale: self.date_of_sale,
            category: self.category,
            sold: self.sold,
        }
    }
}

fn deserialize_record_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RecordId {
        Integer(i64),
        Float(f64),
        Text(String),
    }

    Ok(match RecordId::deserialize(deserializer)? {
        RecordId::Integer(id) => id.to_string(),
        RecordId::Float(id) => id.to_string(),
        RecordId::Text(id) => id,
    })
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// The columns selected by queries that return whole transactions, in the
/// order expected by [map_transaction_row].
pub(crate) const TRANSACTION_COLUMNS: &str =
    "id, title, description, price, date_of_sale, category, sold";

/// Create the transaction table in the database.
///
/// Dates of sale are stored as UTC unix timestamps in nanoseconds so that
/// month windows can be compared numerically without losing sub-second
/// precision. Natural store order is the `rowid`, which follows
/// insertion order.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id TEXT NOT NULL,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                price REAL NOT NULL CHECK (price >= 0),
                date_of_sale INTEGER NOT NULL,
                category TEXT NOT NULL,
                sold INTEGER NOT NULL
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date_of_sale ON \"transaction\"(date_of_sale);",
        (),
    )?;

    Ok(())
}

/// Convert a date of sale to the nanosecond timestamp stored in the table.
///
/// # Errors
/// Returns an error for dates outside the years 1677 to 2262, which do not
/// fit in a 64-bit nanosecond timestamp.
pub(crate) fn to_stored_timestamp(date_time: OffsetDateTime) -> Result<i64, rusqlite::Error> {
    i64::try_from(date_time.unix_timestamp_nanos())
        .map_err(|error| rusqlite::Error::ToSqlConversionFailure(Box::new(error)))
}

/// Like [to_stored_timestamp], but saturates instead of failing.
///
/// Used for query bounds, where a bound past the representable range still
/// compares correctly against every stored value.
pub(crate) fn to_stored_timestamp_saturating(date_time: OffsetDateTime) -> i64 {
    let nanos = date_time.unix_timestamp_nanos();

    i64::try_from(nanos).unwrap_or(if nanos < 0 { i64::MIN } else { i64::MAX })
}

/// Map a database row to a Transaction.
///
/// The row must contain the columns in [TRANSACTION_COLUMNS] order.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let timestamp: i64 = row.get(4)?;
    let date_of_sale = OffsetDateTime::from_unix_timestamp_nanos(i128::from(timestamp))
        .map_err(|error| {
            rusqlite::Error::FromSqlConversionFailure(
                4,
                rusqlite::types::Type::Integer,
                Box::new(error),
            )
        })?;

    Ok(Transaction {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        price: row.get(3)?,
        date_of_sale,
        category: row.get(5)?,
        sold: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::Transaction;

    #[test]
    fn deserializes_seed_shape_with_numeric_id() {
        let json = r#"{
            "id": 1,
            "title": "Fjallraven  - Foldsack No. 1 Backpack, Fits 15 Laptops",
            "price": 329.85,
            "description": "Your perfect pack for everyday use and walks in the forest.",
            "category": "men's clothing",
            "image": "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
            "sold": false,
            "dateOfSale": "2021-11-27T20:29:54+05:30"
        }"#;

        let transaction: Transaction = serde_json::from_str(json).unwrap();

        assert_eq!(transaction.id, "1");
        assert_eq!(transaction.price, 329.85);
        assert_eq!(transaction.category, "men's clothing");
        assert!(!transaction.sold);
        assert_eq!(
            transaction.date_of_sale,
            datetime!(2021 - 11 - 27 20:29:54 +05:30)
        );
    }

    #[test]
    fn deserializes_string_id() {
        let json = r#"{
            "id": "abc",
            "title": "",
            "price": 1,
            "description": "",
            "category": "",
            "sold": true,
            "dateOfSale": "2022-03-01T00:00:00Z"
        }"#;

        let transaction: Transaction = serde_json::from_str(json).unwrap();

        assert_eq!(transaction.id, "abc");
        assert_eq!(transaction.price, 1.0);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let transaction = Transaction::build("7", 12.5, datetime!(2022-03-04 05:06:07 UTC))
            .title("Lamp")
            .sold(true)
            .finalise();

        let value = serde_json::to_value(&transaction).unwrap();

        assert_eq!(value["id"], "7");
        assert_eq!(value["dateOfSale"], "2022-03-04T05:06:07Z");
        assert_eq!(value["sold"], true);
        assert_eq!(value["title"], "Lamp");
    }
}
