//! Transaction records and the queries over them.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and its table
//! - The filter descriptor and month windows used to build queries
//! - Database functions for finding, counting and grouping transactions
//! - The listing route handler

mod core;
mod filter;
mod listing;
mod month;
mod store;

pub use core::{Transaction, create_transaction_table};
pub use filter::{PriceRange, TransactionFilter};
pub use listing::{ListingQuery, ListingState, get_transactions_endpoint, list_transactions};
pub use month::{DateFilter, month_names, parse_month};
pub use store::{
    GroupField, count_all_transactions, count_by, count_transactions, replace_all_transactions,
    sum_prices,
};
