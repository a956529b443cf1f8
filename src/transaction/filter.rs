//! The filter descriptor that decides which transactions a query touches.
//!
//! A [TransactionFilter] can be checked against a record in memory with
//! [TransactionFilter::matches], or compiled into a parameterised SQL `WHERE`
//! clause with [TransactionFilter::to_sql]. Both give the same answer.

use rusqlite::types::Value;

use super::{
    core::{Transaction, to_stored_timestamp_saturating},
    month::DateFilter,
};

/// A free-text search over title, description and price.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchTerm {
    /// The trimmed search text, lowercased for case-insensitive matching.
    text: String,
    /// The search text as a number, if it parses as one.
    price: Option<f64>,
}

impl SearchTerm {
    /// Parse raw search text.
    ///
    /// Returns `None` for blank text, which matches every record.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();

        if text.is_empty() {
            return None;
        }

        let price = text.parse::<f64>().ok().filter(|price| price.is_finite());

        Some(Self {
            text: text.to_ascii_lowercase(),
            price,
        })
    }

    /// Whether the title or description contains the search text, or the
    /// price equals it.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        transaction.title.to_ascii_lowercase().contains(&self.text)
            || transaction
                .description
                .to_ascii_lowercase()
                .contains(&self.text)
            || self.price.is_some_and(|price| transaction.price == price)
    }
}

/// A half-open price range `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    /// Inclusive lower bound.
    pub min: f64,
    /// Exclusive upper bound.
    pub max: f64,
}

impl PriceRange {
    /// Whether `price` is inside the range.
    pub fn contains(&self, price: f64) -> bool {
        self.min <= price && price < self.max
    }
}

/// Describes which transactions match a query.
///
/// All set conditions must hold for a record to match. The default filter
/// matches every record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransactionFilter {
    /// Text or price search, `None` matches all.
    pub search: Option<SearchTerm>,
    /// Restriction on the date of sale.
    pub date: DateFilter,
    /// Restriction on the price.
    pub price: Option<PriceRange>,
    /// Restriction on the sold flag.
    pub sold: Option<bool>,
}

/// A compiled filter: a SQL boolean expression and its bound parameters in
/// placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlFilter {
    /// An expression suitable for a `WHERE` clause, using `?` placeholders.
    pub clause: String,
    /// The values for each `?` in `clause`.
    pub params: Vec<Value>,
}

impl TransactionFilter {
    /// A filter that matches records sold within `date`.
    pub fn for_dates(date: DateFilter) -> Self {
        Self {
            date,
            ..Default::default()
        }
    }

    /// Set the search term from raw search text.
    pub fn search(mut self, text: &str) -> Self {
        self.search = SearchTerm::parse(text);
        self
    }

    /// Restrict matches to the price range.
    pub fn price(mut self, range: PriceRange) -> Self {
        self.price = Some(range);
        self
    }

    /// Restrict matches to records with the given sold flag.
    pub fn sold(mut self, sold: bool) -> Self {
        self.sold = Some(sold);
        self
    }

    /// Evaluate the filter against a record in memory.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        self.search
            .as_ref()
            .is_none_or(|search| search.matches(transaction))
            && self.date.matches(transaction.date_of_sale)
            && self
                .price
                .is_none_or(|range| range.contains(transaction.price))
            && self.sold.is_none_or(|sold| transaction.sold == sold)
    }

    /// Compile the filter into a SQL expression over the transaction table.
    ///
    /// Search text is matched with `instr` on lowercased columns so that no
    /// character in the search needs escaping.
    pub fn to_sql(&self) -> SqlFilter {
        let mut conditions: Vec<&str> = Vec::new();
        let mut params: Vec<Value> = Vec::new();

        if let Some(search) = &self.search {
            params.push(Value::Text(search.text.clone()));
            params.push(Value::Text(search.text.clone()));

            match search.price {
                Some(price) => {
                    params.push(Value::Real(price));
                    conditions.push(
                        "(instr(lower(title), ?) > 0 OR instr(lower(description), ?) > 0 OR price = ?)",
                    );
                }
                None => conditions
                    .push("(instr(lower(title), ?) > 0 OR instr(lower(description), ?) > 0)"),
            }
        }

        match self.date {
            DateFilter::Any => {}
            DateFilter::Within(window) => {
                params.push(Value::Integer(to_stored_timestamp_saturating(window.start)));
                params.push(Value::Integer(to_stored_timestamp_saturating(window.end)));
                conditions.push("(date_of_sale >= ? AND date_of_sale < ?)");
            }
            DateFilter::Nothing => conditions.push("0"),
        }

        if let Some(range) = self.price {
            params.push(Value::Real(range.min));
            params.push(Value::Real(range.max));
            conditions.push("(price >= ? AND price < ?)");
        }

        if let Some(sold) = self.sold {
            params.push(Value::Integer(sold.into()));
            conditions.push("sold = ?");
        }

        let clause = if conditions.is_empty() {
            "1".to_owned()
        } else {
            conditions.join(" AND ")
        };

        SqlFilter { clause, params }
    }
}
